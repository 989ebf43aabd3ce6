//! Chat command parsing.

/// Which help text to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpTopic {
    Short,
    Full,
    Ids,
}

/// A parsed chat command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help(HelpTopic),
    Reload,
    ListSpires,
    SetSpires(Vec<String>),
    AdjustSpires { enable: bool, ids: Vec<String> },
    Pattern(String),
    Tweak(String),
    Debug(Option<bool>),
    /// Raw COWS literal to scale.
    Literal(String),
    Invalid,
}

fn id_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Full-replace list; empty entries are kept so they fail validation.
fn exact_id_list(text: &str) -> Vec<String> {
    text.split(',').map(|id| id.trim().to_string()).collect()
}

fn argument<'a>(body: &'a str, keyword: &str) -> Option<&'a str> {
    body.strip_prefix(keyword).map(str::trim)
}

impl Command {
    /// Parses `text`; returns `None` when it is not addressed to the bot.
    pub fn parse(prefix: &str, text: &str) -> Option<Self> {
        let body = text.trim_start().strip_prefix(prefix)?;

        let command = if argument(body, "reload").is_some() {
            Self::Reload
        } else if let Some(topic) = argument(body, "help") {
            match topic {
                "full" => Self::Help(HelpTopic::Full),
                "ids" => Self::Help(HelpTopic::Ids),
                _ => Self::Help(HelpTopic::Short),
            }
        } else if let Some(line) = argument(body, "spires") {
            if let Some(ids) = line.strip_prefix('+') {
                Self::AdjustSpires {
                    enable: true,
                    ids: id_list(ids),
                }
            } else if let Some(ids) = line.strip_prefix('-') {
                Self::AdjustSpires {
                    enable: false,
                    ids: id_list(ids),
                }
            } else if line.is_empty() {
                Self::ListSpires
            } else {
                Self::SetSpires(exact_id_list(line))
            }
        } else if let Some(line) = argument(body, "pattern") {
            Self::Pattern(line.to_string())
        } else if let Some(line) = argument(body, "tweak") {
            Self::Tweak(line.to_string())
        } else if let Some(flag) = argument(body, "debug") {
            match flag {
                "" => Self::Debug(None),
                "on" | "true" => Self::Debug(Some(true)),
                "off" | "false" => Self::Debug(Some(false)),
                _ => Self::Invalid,
            }
        } else {
            Self::Literal(body.trim().to_string())
        };

        Some(command)
    }
}
