//! Routes a parsed message to exactly one command handler.

use tracing::debug;

use crate::group::GroupList;

use super::context::RequestContext;
use super::handlers::CommandEngine;
use super::parser::{format_help, parse_command, usage, GroupCommand};

/// Outcome of dispatching one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Command that handled the message.
    pub command: GroupCommand,
    /// Reply text for the transport.
    pub reply: String,
}

impl Dispatch {
    /// Whether the registry may have changed.
    pub fn mutated(&self) -> bool {
        self.command.is_mutating()
    }
}

impl CommandEngine {
    /// Parse `ctx.text` and run the matching command.
    ///
    /// When the context carries no command span the parser's span is used,
    /// so broadcasts splice exactly the command the user typed.
    pub fn dispatch(&self, groups: &mut GroupList, ctx: &RequestContext) -> Dispatch {
        let parsed = parse_command(&ctx.text, self.bot_name());
        debug!(command = %parsed.command, group = %parsed.group_name, "Dispatching command");

        if parsed.command.requires_group() && parsed.group_name.is_empty() {
            let reply = match usage(self.bot_name(), &parsed.command) {
                Some(syntax) => format!(
                    "Please tell me which group to {}, e.g. \"{syntax}\"",
                    parsed.command
                ),
                None => format_help(self.bot_name()),
            };
            return Dispatch {
                command: parsed.command,
                reply,
            };
        }

        let mut request = ctx.clone();
        if request.command_span.is_none() {
            request.command_span = Some(parsed.span.clone());
        }
        let name = parsed.group_name.as_str();

        let reply = match &parsed.command {
            GroupCommand::Create => self.create(groups, name, &request),
            GroupCommand::Delete => self.delete(groups, name, &request),
            GroupCommand::Add => self.add_members(groups, name, &request),
            GroupCommand::Remove => self.remove_members(groups, name, &request),
            GroupCommand::Restrict => self.restrict(groups, name, &request),
            GroupCommand::Notify => self.notify(groups, name, &request),
            GroupCommand::List => self.list(groups, name, &request),
            GroupCommand::Help => format_help(self.bot_name()),
            GroupCommand::Unknown(word) => format!(
                "I don't know how to {word:?}. Say \"{} help\" to see what I can do.",
                self.bot_name()
            ),
        };

        Dispatch {
            command: parsed.command,
            reply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ChatUser, Mention};

    fn engine() -> CommandEngine {
        CommandEngine::new("@rollcall")
    }

    fn message(text: &str) -> RequestContext {
        RequestContext::new("Carol", "spaces/A", text)
            .with_mention(Mention::user(ChatUser::bot("rollcall", "users/bot")))
    }

    #[test]
    fn test_dispatch_create_then_list() {
        let mut groups = GroupList::new();
        let ctx = message("@rollcall create eng @Alice")
            .with_mention(Mention::user(ChatUser::human("Alice", "users/1")));

        let result = engine().dispatch(&mut groups, &ctx);
        assert_eq!(result.command, GroupCommand::Create);
        assert!(result.mutated());
        assert_eq!(result.reply, "Created group \"eng\" with user(s) Alice");

        let result = engine().dispatch(&mut groups, &message("@rollcall list"));
        assert!(!result.mutated());
        assert!(result.reply.contains("```eng```"));
    }

    #[test]
    fn test_dispatch_notify_uses_parsed_span() {
        let mut groups = GroupList::new();
        let ctx = message("@rollcall create eng @Alice")
            .with_mention(Mention::user(ChatUser::human("Alice", "users/1")));
        engine().dispatch(&mut groups, &ctx);

        let result = engine().dispatch(
            &mut groups,
            &message("eng lunch: @rollcall notify eng at noon"),
        );
        assert_eq!(result.command, GroupCommand::Notify);
        assert_eq!(result.reply, "Carol said:\n\neng lunch: <users/1>  at noon");
    }

    #[test]
    fn test_dispatch_missing_group_name() {
        let mut groups = GroupList::new();
        let result = engine().dispatch(&mut groups, &message("@rollcall delete"));
        assert_eq!(
            result.reply,
            "Please tell me which group to delete, e.g. \"@rollcall delete <group>\""
        );
        assert!(groups.is_empty());
    }

    #[test]
    fn test_dispatch_help_and_unknown() {
        let mut groups = GroupList::new();

        let result = engine().dispatch(&mut groups, &message("@rollcall"));
        assert_eq!(result.command, GroupCommand::Help);
        assert!(result.reply.contains("Here's what I can do"));

        let result = engine().dispatch(&mut groups, &message("@rollcall dance"));
        assert_eq!(result.command, GroupCommand::Unknown("dance".to_string()));
        assert!(result.reply.contains("\"@rollcall help\""));
    }

    #[test]
    fn test_dispatch_keeps_supplied_span() {
        let mut groups = GroupList::new();
        engine().dispatch(&mut groups, &message("@rollcall create eng"));

        let ctx = message("@rollcall notify eng hi").with_command_span(0..9);
        let result = engine().dispatch(&mut groups, &ctx);
        assert_eq!(result.reply, "Carol said:\n\n notify eng hi");
    }
}
