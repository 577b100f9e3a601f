/// Content a CreateFile request may produce. Filename and body come from
/// here only; nothing from the request text or the chat gateway is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTemplate {
    DashboardTutorial,
    Note,
}

const DASHBOARD_TUTORIAL: &str = "\
# MIST Dashboard Tutorial
1. Open http://127.0.0.1:8765/dashboard in your browser.
2. Confirm Pulse and Gateway badges show online in the top-right strip.
3. Set your profile in Companion Bond and click Save Profile.
4. Send a message in Gateway Channel and watch Event Log for actual action results.
5. Use Poll Manifest to refresh system metrics, Cosmic Uplink, and avatar mood.
";

const NOTE: &str = "# MIST Note\n\nCreated locally by MIST companion.\n";

impl NoteTemplate {
    pub fn file_name(self) -> &'static str {
        "MIST.md"
    }

    pub fn body(self) -> &'static str {
        match self {
            Self::DashboardTutorial => DASHBOARD_TUTORIAL,
            Self::Note => NOTE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DashboardTutorial => "dashboard tutorial",
            Self::Note => "note",
        }
    }
}
