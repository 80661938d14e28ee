use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use lexi_core::{ReviewPick, TableQuery, submit_suggestion};
use lexi_types::DictionaryEntry;

use crate::cli::Command;
use crate::controller::AppController;
use crate::output::{render_entry, render_list, render_report, render_table};

/// Run one subcommand, returning what should be printed to stdout
pub async fn execute(command: Command, app: &mut AppController) -> anyhow::Result<String> {
    match command {
        Command::Search { query } => {
            let hits = app.store.search(&query);
            if hits.is_empty() {
                return Ok(format!("No entries match '{query}'"));
            }
            Ok(render_list(&hits))
        }

        Command::Show { id } => {
            let entry = app.store.get(&id).with_context(|| format!("No entry with id {id}"))?;
            Ok(render_entry(&entry))
        }

        Command::List {
            filter,
            sort,
            desc,
            page,
        } => {
            let query = TableQuery {
                filter: filter.unwrap_or_default(),
                sort,
                descending: desc,
                page,
            };
            Ok(render_table(&app.store.table(&query)))
        }

        Command::Random => match app.store.random() {
            Some(entry) => Ok(render_entry(&entry)),
            None => Ok("Dictionary is empty".to_string()),
        },

        Command::Next => match app.store.least_voted(app.config.user.id.as_deref()) {
            ReviewPick::Candidate(entry) => Ok(render_entry(&entry)),
            ReviewPick::AllCaughtUp => Ok("All caught up, you voted on every entry".to_string()),
            ReviewPick::Empty => Ok("Dictionary is empty".to_string()),
        },

        Command::Vote { id, direction } => {
            let user = app.require_user()?;
            if app.store.get(&id).is_none() {
                bail!("No entry with id {id}");
            }

            let state = app.store.vote(&id, &user, direction);
            let entry = app.store.get(&id).context("Entry vanished while voting")?;
            let stats = entry.stats();
            let verb = match state {
                Some(direction) => format!("Voted {direction}"),
                None => "Vote removed".to_string(),
            };
            Ok(format!(
                "{verb} on '{}' (+{} -{})",
                entry.headword, stats.upvotes, stats.downvotes
            ))
        }

        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = app
                .store
                .import_json(&raw)
                .with_context(|| format!("{} is not a JSON array of entries", file.display()))?;
            Ok(render_report(&report))
        }

        Command::Export { file } => {
            let json = app.store.export_json()?;
            match file {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok(format!("Exported {} entries to {}", app.store.len(), path.display()))
                }
                None => Ok(json),
            }
        }

        Command::Generate { topic, count } => {
            let count = count.unwrap_or(app.config.generator.default_count);
            let entries = app.generator.generate_words(&topic, count).await?;
            if entries.is_empty() {
                return Ok(format!("Nothing generated for '{topic}'"));
            }

            let listing = render_list(&entries);
            let report = app.store.add_entries(entries);
            Ok(format!("{listing}\n{}", render_report(&report)))
        }

        Command::Define { word } => match app.generator.define_word(&word).await? {
            Some(entry) => {
                let card = render_entry(&entry);
                let report = app.store.add_entries(vec![entry]);
                Ok(format!("{card}\n{}", render_report(&report)))
            }
            None => Ok(format!("No definition generated for '{word}'")),
        },

        Command::Correct { headword } => {
            let entry = find(app, &headword)?;
            let corrected = app.generator.check_and_correct(&entry).await?;
            replace_with(app, &entry, corrected)
        }

        Command::Enrich { headword } => {
            let entry = find(app, &headword)?;
            let enriched = app.generator.enrich_examples(&entry).await?;
            replace_with(app, &entry, enriched)
        }

        Command::Edit { headword, file } => {
            let replacement = read_entry(&file)?;
            if !app.store.update_entry(&headword, replacement) {
                bail!("No entry with headword '{headword}'");
            }
            Ok(format!("Updated '{headword}'"))
        }

        Command::Delete { headword } => {
            let removed = app.store.delete_entry(&headword);
            Ok(format!("Deleted {removed} entries named '{headword}'"))
        }

        Command::Suggest { headword, file } => {
            let user = app.require_user()?;
            let proposed = read_entry(&file)?;
            let original_id = app.store.find(&headword).and_then(|e| e.id);

            submit_suggestion(
                app.gateway.as_ref(),
                &app.tables.suggestions,
                original_id,
                &user,
                proposed,
            )
            .await
            .context("Failed to submit suggestion")?;
            Ok(format!("Suggestion for '{headword}' submitted for review"))
        }

        Command::Pull => {
            let report = app.pull().await?;
            Ok(render_report(&report))
        }
    }
}

fn find(app: &AppController, headword: &str) -> anyhow::Result<DictionaryEntry> {
    app.store
        .find(headword)
        .with_context(|| format!("No entry with headword '{headword}'"))
}

/// Swap `original` for the generator's version, keeping its slot and id
fn replace_with(
    app: &mut AppController,
    original: &DictionaryEntry,
    generated: Option<DictionaryEntry>,
) -> anyhow::Result<String> {
    let Some(mut generated) = generated else {
        return Ok(format!("Generator returned nothing for '{}'", original.headword));
    };
    generated.id = original.id.clone();

    let card = render_entry(&generated);
    if !app.store.update_entry(&original.headword, generated) {
        bail!("'{}' was removed meanwhile", original.headword);
    }
    Ok(card)
}

fn read_entry(path: &Path) -> anyhow::Result<DictionaryEntry> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entry: DictionaryEntry = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a dictionary entry", path.display()))?;
    if entry.headword.trim().is_empty() {
        bail!("{} has an empty headword", path.display());
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use lexi_config::Config;
    use lexi_core::SortKey;
    use lexi_generator::GenerateError;
    use lexi_types::VoteDirection;
    use tempfile::TempDir;

    use super::*;
    use crate::controller::tests::offline_controller;

    fn signed_in() -> Config {
        let mut config = Config::default();
        config.user.id = Some("u1".to_string());
        config
    }

    #[tokio::test]
    async fn test_blank_search_reports_nothing() {
        let mut app = offline_controller(Config::default());
        let out = execute(Command::Search { query: "  ".into() }, &mut app)
            .await
            .unwrap();
        assert_eq!(out, "No entries match '  '");
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_pages_through_collection() {
        let mut app = offline_controller(Config::default());
        let list = |page| Command::List {
            filter: None,
            sort: SortKey::Upvotes,
            desc: true,
            page,
        };

        let out = execute(list(1), &mut app).await.unwrap();
        let total = app.store.len();
        assert!(out.ends_with(&format!("({total} entries)")));

        let filtered = execute(
            Command::List {
                filter: Some("APPLE".into()),
                sort: SortKey::Headword,
                desc: false,
                page: 1,
            },
            &mut app,
        )
        .await
        .unwrap();
        assert!(filtered.lines().nth(1).unwrap().starts_with("apple"));
        assert!(filtered.ends_with("Page 1/1 (1 entries)"));
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_vote_requires_sign_in() {
        let mut app = offline_controller(Config::default());
        let id = app.store.get_all()[0].id.clone().unwrap();

        let result = execute(
            Command::Vote {
                id,
                direction: VoteDirection::Up,
            },
            &mut app,
        )
        .await;
        assert!(result.is_err());
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_vote_then_retract() {
        let mut app = offline_controller(signed_in());
        let entry = app.store.get_all()[0].clone();
        let id = entry.id.clone().unwrap();
        let before = entry.stats();

        let vote = || Command::Vote {
            id: id.clone(),
            direction: VoteDirection::Up,
        };

        let out = execute(vote(), &mut app).await.unwrap();
        assert!(out.starts_with("Voted up"));
        assert_eq!(app.store.get(&id).unwrap().stats().upvotes, before.upvotes + 1);

        let out = execute(vote(), &mut app).await.unwrap();
        assert!(out.starts_with("Vote removed"));
        assert_eq!(app.store.get(&id).unwrap().stats(), before);
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_export_then_import_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        let mut app = offline_controller(Config::default());

        execute(Command::Export { file: Some(path.clone()) }, &mut app)
            .await
            .unwrap();
        let out = execute(Command::Import { file: path }, &mut app).await.unwrap();

        assert_eq!(out, "0 added, 0 updated");
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apple.json");
        fs::write(
            &path,
            r#"{ "headword": "apple", "source_lang": "en", "target_lang": "my", "senses": [] }"#,
        )
        .unwrap();
        let mut app = offline_controller(Config::default());
        let id = app.store.find("apple").unwrap().id;

        execute(
            Command::Edit {
                headword: "apple".into(),
                file: path.clone(),
            },
            &mut app,
        )
        .await
        .unwrap();
        let edited = app.store.find("apple").unwrap();
        assert_eq!(edited.id, id);
        assert!(edited.senses.is_empty());

        let missing = execute(
            Command::Edit {
                headword: "pear".into(),
                file: path,
            },
            &mut app,
        )
        .await;
        assert!(missing.is_err());

        let out = execute(Command::Delete { headword: "apple".into() }, &mut app)
            .await
            .unwrap();
        assert_eq!(out, "Deleted 1 entries named 'apple'");
        assert!(app.store.find("apple").is_none());
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_generate_without_key_surfaces_error() {
        let mut app = offline_controller(Config::default());
        let before = app.store.len();

        let err = execute(
            Command::Generate {
                topic: "food".into(),
                count: None,
            },
            &mut app,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::MissingApiKey)
        ));
        assert_eq!(app.store.len(), before);
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_suggest_goes_through_offline_gateway() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proposal.json");
        fs::write(
            &path,
            r#"{ "headword": "apple", "source_lang": "en", "target_lang": "my", "senses": [] }"#,
        )
        .unwrap();
        let mut app = offline_controller(signed_in());

        let out = execute(
            Command::Suggest {
                headword: "apple".into(),
                file: path,
            },
            &mut app,
        )
        .await
        .unwrap();
        assert_eq!(out, "Suggestion for 'apple' submitted for review");
        app.shutdown().await;
    }
}
