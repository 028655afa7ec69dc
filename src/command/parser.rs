//! Command parser for messages addressed to the bot.
//!
//! A command looks like `@bot <command> [group] [anything else]`. The parser
//! records the byte span from the bot token through the group-name token so
//! broadcasts can splice the exact text the user typed.

use std::ops::Range;

/// A group command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCommand {
    /// Create a group from the mentioned users.
    Create,
    /// Delete a group.
    Delete,
    /// Add the mentioned users to a group.
    Add,
    /// Remove the mentioned users from a group.
    Remove,
    /// Toggle room privacy of a group.
    Restrict,
    /// Mention every member of a group.
    Notify,
    /// List groups or show one group.
    List,
    /// Show help.
    Help,
    /// Unknown command.
    Unknown(String),
}

impl GroupCommand {
    /// Resolve a command word (case-insensitive, aliases included).
    pub fn from_word(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "create" | "new" => GroupCommand::Create,
            "delete" | "destroy" => GroupCommand::Delete,
            "add" | "join" => GroupCommand::Add,
            "remove" | "rm" | "kick" => GroupCommand::Remove,
            "restrict" | "private" | "public" => GroupCommand::Restrict,
            "notify" | "ping" | "tell" => GroupCommand::Notify,
            "list" | "ls" | "show" => GroupCommand::List,
            "help" | "h" | "?" => GroupCommand::Help,
            _ => GroupCommand::Unknown(word.to_string()),
        }
    }

    /// Get the command name.
    pub fn name(&self) -> &str {
        match self {
            GroupCommand::Create => "create",
            GroupCommand::Delete => "delete",
            GroupCommand::Add => "add",
            GroupCommand::Remove => "remove",
            GroupCommand::Restrict => "restrict",
            GroupCommand::Notify => "notify",
            GroupCommand::List => "list",
            GroupCommand::Help => "help",
            GroupCommand::Unknown(cmd) => cmd,
        }
    }

    /// Whether the command cannot run without a group name.
    pub fn requires_group(&self) -> bool {
        matches!(
            self,
            GroupCommand::Create
                | GroupCommand::Delete
                | GroupCommand::Add
                | GroupCommand::Remove
                | GroupCommand::Restrict
                | GroupCommand::Notify
        )
    }

    /// Whether the command may change the registry.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            GroupCommand::Create
                | GroupCommand::Delete
                | GroupCommand::Add
                | GroupCommand::Remove
                | GroupCommand::Restrict
        )
    }
}

impl std::fmt::Display for GroupCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The command.
    pub command: GroupCommand,
    /// Group name as typed; empty when absent.
    pub group_name: String,
    /// Bytes from the bot token through the last consumed token.
    pub span: Range<usize>,
}

/// Parse a message addressed to the bot.
///
/// Parsing starts after the first occurrence of `bot_name`; when the token
/// is absent (direct messages) it starts at the beginning of the text. A
/// message without a command word is treated as a help request.
pub fn parse_command(text: &str, bot_name: &str) -> ParsedCommand {
    let found = if bot_name.is_empty() {
        None
    } else {
        text.find(bot_name)
    };
    let (start, cursor) = match found {
        Some(pos) => (pos, pos + bot_name.len()),
        None => (0, 0),
    };

    let Some(cmd) = next_word(text, cursor) else {
        return ParsedCommand {
            command: GroupCommand::Help,
            group_name: String::new(),
            span: start..cursor,
        };
    };
    let command = GroupCommand::from_word(&text[cmd.clone()]);

    match next_word(text, cmd.end) {
        Some(group) => ParsedCommand {
            command,
            group_name: text[group.clone()].to_string(),
            span: start..group.end,
        },
        None => ParsedCommand {
            command,
            group_name: String::new(),
            span: start..cmd.end,
        },
    }
}

/// Byte range of the next whitespace-delimited word at or after `from`.
fn next_word(text: &str, from: usize) -> Option<Range<usize>> {
    let rest = text.get(from..)?;
    let offset = rest.find(|c: char| !c.is_whitespace())?;
    let start = from + offset;
    let len = text[start..]
        .find(char::is_whitespace)
        .unwrap_or(text.len() - start);
    Some(start..start + len)
}

/// Command information for help display.
pub struct CommandInfo {
    /// Command name.
    pub name: &'static str,
    /// Command aliases.
    pub aliases: &'static [&'static str],
    /// Arguments after the command word.
    pub syntax: &'static str,
    /// Command description.
    pub description: &'static str,
}

/// Get all available command information.
pub fn get_command_help() -> Vec<CommandInfo> {
    vec![
        CommandInfo {
            name: "create",
            aliases: &["new"],
            syntax: "create <group> @Members...",
            description: "Create a group from the mentioned users",
        },
        CommandInfo {
            name: "delete",
            aliases: &["destroy"],
            syntax: "delete <group>",
            description: "Delete a group and all of its data",
        },
        CommandInfo {
            name: "add",
            aliases: &["join"],
            syntax: "add <group> @Members...",
            description: "Add the mentioned users to a group",
        },
        CommandInfo {
            name: "remove",
            aliases: &["rm", "kick"],
            syntax: "remove <group> @Members...",
            description: "Remove the mentioned users from a group",
        },
        CommandInfo {
            name: "restrict",
            aliases: &["private", "public"],
            syntax: "restrict <group>",
            description: "Toggle whether a group can only be used in this room",
        },
        CommandInfo {
            name: "notify",
            aliases: &["ping", "tell"],
            syntax: "notify <group> <message>",
            description: "Send your message mentioning every member of a group",
        },
        CommandInfo {
            name: "list",
            aliases: &["ls", "show"],
            syntax: "list [group]",
            description: "List usable groups, or show the members of one group",
        },
        CommandInfo {
            name: "help",
            aliases: &["h", "?"],
            syntax: "help",
            description: "Show this help",
        },
    ]
}

/// Syntax line for a command, as the user would type it.
pub fn usage(bot_name: &str, command: &GroupCommand) -> Option<String> {
    get_command_help()
        .into_iter()
        .find(|info| info.name == command.name())
        .map(|info| format!("{bot_name} {}", info.syntax))
}

/// Format the help message for display.
pub fn format_help(bot_name: &str) -> String {
    let mut lines = Vec::new();
    lines.push("Here's what I can do:".to_string());
    lines.push(String::new());

    for info in get_command_help() {
        lines.push(format!("{bot_name} {}", info.syntax));
        if !info.aliases.is_empty() {
            lines.push(format!("  aliases: {}", info.aliases.join(", ")));
        }
        lines.push(format!("  {}", info.description));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "@rollcall";

    #[test]
    fn test_parse_command_and_group() {
        let parsed = parse_command("@rollcall create eng @Alice @Bob", BOT);
        assert_eq!(parsed.command, GroupCommand::Create);
        assert_eq!(parsed.group_name, "eng");
        assert_eq!(parsed.span, 0..20);
    }

    #[test]
    fn test_parse_span_with_leading_text() {
        let text = "hey team, @rollcall  notify   Eng standup in 5";
        let parsed = parse_command(text, BOT);
        assert_eq!(parsed.command, GroupCommand::Notify);
        assert_eq!(parsed.group_name, "Eng");
        assert_eq!(&text[parsed.span.clone()], "@rollcall  notify   Eng");
    }

    #[test]
    fn test_parse_without_bot_token() {
        let parsed = parse_command("list eng", BOT);
        assert_eq!(parsed.command, GroupCommand::List);
        assert_eq!(parsed.group_name, "eng");
        assert_eq!(parsed.span, 0..8);
    }

    #[test]
    fn test_parse_command_without_group() {
        let parsed = parse_command("@rollcall list", BOT);
        assert_eq!(parsed.command, GroupCommand::List);
        assert_eq!(parsed.group_name, "");
        assert_eq!(parsed.span, 0..14);
    }

    #[test]
    fn test_parse_bot_only_is_help() {
        let parsed = parse_command("@rollcall", BOT);
        assert_eq!(parsed.command, GroupCommand::Help);
        assert_eq!(parsed.span, 0..9);

        let parsed = parse_command("   ", BOT);
        assert_eq!(parsed.command, GroupCommand::Help);
    }

    #[test]
    fn test_parse_case_insensitive_and_aliases() {
        assert_eq!(parse_command("@rollcall CREATE x", BOT).command, GroupCommand::Create);
        assert_eq!(parse_command("@rollcall rm x", BOT).command, GroupCommand::Remove);
        assert_eq!(parse_command("@rollcall ping x", BOT).command, GroupCommand::Notify);
        assert_eq!(parse_command("@rollcall ls", BOT).command, GroupCommand::List);
        assert_eq!(parse_command("@rollcall ?", BOT).command, GroupCommand::Help);
        assert_eq!(
            parse_command("@rollcall private x", BOT).command,
            GroupCommand::Restrict
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        let parsed = parse_command("@rollcall frobnicate eng", BOT);
        assert_eq!(parsed.command, GroupCommand::Unknown("frobnicate".to_string()));
        assert_eq!(parsed.group_name, "eng");
    }

    #[test]
    fn test_parse_uses_first_bot_token() {
        let text = "@rollcall add eng @Alice thanks @rollcall";
        let parsed = parse_command(text, BOT);
        assert_eq!(parsed.command, GroupCommand::Add);
        assert_eq!(parsed.span, 0..17);
    }

    #[test]
    fn test_parse_multibyte_text() {
        let text = "こんにちは @rollcall notify 開発 よろしく";
        let parsed = parse_command(text, BOT);
        assert_eq!(parsed.command, GroupCommand::Notify);
        assert_eq!(parsed.group_name, "開発");
        assert_eq!(&text[parsed.span.clone()], "@rollcall notify 開発");
    }

    #[test]
    fn test_command_flags() {
        assert!(GroupCommand::Create.requires_group());
        assert!(GroupCommand::Notify.requires_group());
        assert!(!GroupCommand::List.requires_group());
        assert!(!GroupCommand::Help.requires_group());

        assert!(GroupCommand::Restrict.is_mutating());
        assert!(!GroupCommand::Notify.is_mutating());
        assert!(!GroupCommand::List.is_mutating());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(GroupCommand::Create.to_string(), "create");
        assert_eq!(GroupCommand::Unknown("foo".to_string()).to_string(), "foo");
    }

    #[test]
    fn test_usage() {
        assert_eq!(
            usage(BOT, &GroupCommand::Add).as_deref(),
            Some("@rollcall add <group> @Members...")
        );
        assert_eq!(usage(BOT, &GroupCommand::Unknown("x".to_string())), None);
    }

    #[test]
    fn test_format_help() {
        let help = format_help(BOT);
        for name in ["create", "delete", "add", "remove", "restrict", "notify", "list"] {
            assert!(help.contains(&format!("@rollcall {name}")));
        }
        assert!(help.contains("aliases: rm, kick"));
    }
}
