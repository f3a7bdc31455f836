use super::{RenameResolver, Renameable, Resolution};
use console::style;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use tracing::warn;

/// Asks on the terminal, for each new entity, whether it is created fresh or
/// renamed from one of the entities that disappeared.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveResolver;

impl<T: Renameable> RenameResolver<T> for InteractiveResolver {
    fn resolve(&self, only_in_from: Vec<T>, only_in_to: Vec<T>) -> Resolution<T> {
        if only_in_from.is_empty() || only_in_to.is_empty() {
            return Resolution::unmatched(only_in_from, only_in_to);
        }

        let mut candidates = only_in_from;
        let mut matched = Vec::new();
        let mut unmatched_to = Vec::new();
        let theme = ColorfulTheme::default();

        for created in only_in_to {
            if candidates.is_empty() {
                unmatched_to.push(created);
                continue;
            }

            let created_key = created.rename_key();
            let mut items = vec![format!("{} create {}", style("+").green(), created_key)];
            items.extend(candidates.iter().map(|c| {
                format!(
                    "{} rename {} {} {}",
                    style("~").yellow(),
                    c.rename_key(),
                    style("›").dim(),
                    created_key
                )
            }));

            let prompt = format!(
                "Is {} {} created or renamed from another {}?",
                T::KIND,
                style(&created_key).bold(),
                T::KIND
            );
            let choice = match Select::with_theme(&theme)
                .with_prompt(prompt)
                .items(&items)
                .default(0)
                .interact()
            {
                Ok(choice) => choice,
                Err(e) => {
                    warn!("Rename prompt failed ({}), treating {} as new", e, created_key);
                    0
                }
            };

            if choice == 0 {
                unmatched_to.push(created);
            } else {
                let from = candidates.remove(choice - 1);
                matched.push((from, created));
            }
        }

        Resolution {
            matched,
            unmatched_from: candidates,
            unmatched_to,
        }
    }
}
