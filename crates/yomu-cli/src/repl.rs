use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use yomu_core::LoadError;
use yomu_lang_japanese::JapaneseProcessor;
use yomu_search::{SearchCoordinator, SearchEvent, SearchPage};

use crate::output::Printer;

/// Interactive search: every line is a query, debounced like typing.
///
/// `:more` prints the next page, `:import <id> <path>` adds a term bank,
/// `:quit` exits.
pub async fn run(
    processor: Arc<JapaneseProcessor>,
    coordinator: SearchCoordinator,
    printer: Printer<'_>,
) -> anyhow::Result<()> {
    let events = coordinator.events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&processor, &coordinator, &printer, line.trim()).await? {
                    break;
                }
            }
            event = events.recv() => {
                match event? {
                    SearchEvent::Results(page) => print_page(&printer, &page)?,
                    SearchEvent::NoResults { query, .. } => println!("No results for {query}"),
                }
            }
        }
    }

    coordinator.shutdown();
    Ok(())
}

/// Returns false when the session should end
async fn handle_line(
    processor: &Arc<JapaneseProcessor>,
    coordinator: &SearchCoordinator,
    printer: &Printer<'_>,
    line: &str,
) -> anyhow::Result<bool> {
    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        [] => {}
        [":quit"] | [":q"] => return Ok(false),
        [":more"] => match coordinator.next_page() {
            Some(page) => print_page(printer, &page)?,
            None => println!("No more results"),
        },
        [":import", id, path] => {
            match import(processor.clone(), id, PathBuf::from(path)).await? {
                Ok(count) => println!("Imported {count} entries as {id}"),
                Err(e) => tracing::warn!("Import of {} failed: {}", id, e),
            }
        }
        _ => {
            coordinator.submit(line);
        }
    }

    Ok(true)
}

/// Load a term bank on the blocking pool so pending search events keep flowing.
async fn import(
    processor: Arc<JapaneseProcessor>,
    id: &str,
    path: PathBuf,
) -> anyhow::Result<Result<usize, LoadError>> {
    let id = id.to_string();
    let imported =
        tokio::task::spawn_blocking(move || processor.import_dictionary(&id, &path)).await?;
    Ok(imported)
}

fn print_page(printer: &Printer<'_>, page: &SearchPage) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    printer.entries(&mut stdout, &page.entries)?;
    if page.has_more {
        writeln!(
            stdout,
            "-- page {} of {} results, :more for next --",
            page.page + 1,
            page.total
        )?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use yomu_config::Config;
    use yomu_core::SourceId;

    use super::*;

    #[tokio::test]
    async fn test_import_runs_off_the_runtime() {
        let dir = std::env::temp_dir().join(format!("yomu-repl-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let bank = dir.join("bank.json");
        std::fs::write(&bank, r#"[["走り屋", "はしりや", "n", "", 0, ["street racer"], 1, ""]]"#)
            .unwrap();

        let processor = Arc::new(JapaneseProcessor::from_config(&Config::default()));
        let count = import(processor.clone(), "racing", bank.clone()).await.unwrap();
        assert_eq!(count.unwrap(), 1);
        assert_eq!(processor.source_ids(), vec![SourceId::imported("racing")]);

        // A failed load is reported, not raised
        let again = import(processor.clone(), "racing", bank).await.unwrap();
        assert!(again.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
