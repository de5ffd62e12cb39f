//! `memo` command line front-end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the memo database.
//! - Drive `MemoStore` and `MemoViewer` from subcommands.
//!
//! # Invariants
//! - Storage failures print the localized user message, never raw SQL errors.
//! - Destructive commands ask on stdin unless `--yes` is given.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use memo_core::db::open_db;
use memo_core::viewer::category_style::category_label;
use memo_core::{
    init_logging, preview_text, CategoryFilter, HttpSummarizer, Locale, Memo, MemoCategory,
    MemoConfig, MemoFormData, MemoGateway, MemoId, MemoStore, MemoViewer, PersistenceResult,
    PlainTextRenderer, SqliteMemoRepository, SummaryOutcome, ViewerActions, ViewerDisplay,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "memo")]
#[command(version)]
#[command(about = "Categorized markdown memos backed by SQLite")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "MEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overrides config and environment
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List memos, newest first
    List {
        /// Category name or `all`
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Case-insensitive text over title, content and tags
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one memo
    Show {
        id: MemoId,
    },

    /// Create a memo
    Add {
        #[arg(short, long)]
        title: String,

        /// Markdown body
        #[arg(short = 'b', long, default_value = "")]
        content: String,

        #[arg(short, long, default_value = "other")]
        category: MemoCategory,

        /// Repeat for several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit a memo; omitted fields keep their values
    Edit {
        id: MemoId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        #[arg(short, long)]
        category: Option<MemoCategory>,

        /// Replaces all tags when given
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Delete a memo
    Rm {
        id: MemoId,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Search title and content in storage
    Search {
        query: String,
    },

    /// Delete every memo
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show counts per category
    Stats,

    /// Generate an AI summary for a memo
    Summarize {
        id: MemoId,
    },
}

/// Collects viewer callbacks so the command can act on them afterwards.
#[derive(Default)]
struct CollectedActions {
    edit: Option<MemoId>,
    delete: Option<MemoId>,
}

impl ViewerActions for CollectedActions {
    fn on_close(&mut self) {}

    fn on_edit(&mut self, memo: &Memo) {
        self.edit = Some(memo.id);
    }

    fn on_delete(&mut self, id: MemoId) {
        self.delete = Some(id);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.log_level, &config.log_dir).context("failed to initialize logging")?;
    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let repo = SqliteMemoRepository::try_new(&conn).context("memo database is not ready")?;
    let mut store = MemoStore::open(MemoGateway::new(repo));

    run(cli.command, &config, &mut store)
}

fn resolve_config(cli: &Cli) -> anyhow::Result<MemoConfig> {
    let mut config = match &cli.config {
        Some(path) => MemoConfig::load(path)?,
        None => MemoConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn run(
    command: Commands,
    config: &MemoConfig,
    store: &mut MemoStore<SqliteMemoRepository<'_>>,
) -> anyhow::Result<()> {
    let locale = config.locale;
    match command {
        Commands::List { category, query } => {
            store.filter_by_category(category);
            store.search(query.unwrap_or_default());
            for memo in store.memos() {
                print_row(memo, locale);
            }
            let stats = store.stats();
            println!("({}/{})", stats.filtered, stats.total);
        }
        Commands::Show { id } => {
            let mut viewer = MemoViewer::new(locale);
            viewer.show(Some(find(store, id)?.clone()));
            if let Some(display) = viewer.display(&PlainTextRenderer) {
                print_display(&display);
            }
        }
        Commands::Add {
            title,
            content,
            category,
            tags,
        } => {
            let form = MemoFormData::new(title, content)
                .with_category(category)
                .with_tags(tags);
            let memo = user_facing(store.create(&form), locale)?;
            println!("{}", memo.id);
        }
        Commands::Edit {
            id,
            title,
            content,
            category,
            tags,
            clear_tags,
        } => {
            let mut viewer = MemoViewer::new(locale);
            let mut actions = CollectedActions::default();
            viewer.show(Some(find(store, id)?.clone()));
            viewer.edit(&mut actions);

            let Some(id) = actions.edit else {
                return Ok(());
            };
            let mut form = find(store, id)?.form_data();
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(content) = content {
                form.content = content;
            }
            if let Some(category) = category {
                form.category = category;
            }
            if clear_tags {
                form.tags.clear();
            } else if !tags.is_empty() {
                form.tags = tags;
            }
            let memo = user_facing(store.update(id, &form), locale)?;
            println!("{}", memo.id);
        }
        Commands::Rm { id, yes } => {
            let mut viewer = MemoViewer::new(locale);
            let mut actions = CollectedActions::default();
            viewer.show(Some(find(store, id)?.clone()));

            let mut prompt_error = None;
            viewer.delete(&mut actions, |_| {
                if yes {
                    return true;
                }
                ask(delete_prompt(locale)).unwrap_or_else(|err| {
                    prompt_error = Some(err);
                    false
                })
            });
            if let Some(err) = prompt_error {
                return Err(err).context("failed to read confirmation");
            }
            if let Some(id) = actions.delete {
                user_facing(store.delete(id), locale)?;
                println!("{id}");
            }
        }
        Commands::Search { query } => {
            let hits = user_facing(store.gateway().search(&query), locale)?;
            for memo in &hits {
                print_row(memo, locale);
            }
        }
        Commands::Clear { yes } => {
            if !yes && !ask(clear_prompt(locale)).context("failed to read confirmation")? {
                return Ok(());
            }
            let removed = user_facing(store.clear_all(), locale)?;
            println!("{removed}");
        }
        Commands::Stats => {
            let stats = store.stats();
            println!("total\t{}", stats.total);
            for category in MemoCategory::ALL {
                let count = stats.by_category.get(&category).copied().unwrap_or(0);
                println!("{}\t{count}", category_label(category, locale));
            }
        }
        Commands::Summarize { id } => {
            let summarizer = HttpSummarizer::try_new(config.summary_endpoint.clone())
                .context("failed to build summary client")?;
            let mut viewer = MemoViewer::new(locale);
            viewer.show(Some(find(store, id)?.clone()));

            match viewer.summarize(&summarizer) {
                Some(SummaryOutcome::Ready) => {
                    let summary = viewer
                        .display(&PlainTextRenderer)
                        .and_then(|display| display.summary);
                    println!("{}", summary.unwrap_or_default());
                }
                Some(SummaryOutcome::Failed { alert }) => bail!(alert),
                Some(SummaryOutcome::Stale) | None => {}
            }
        }
    }
    Ok(())
}

fn find<'a>(
    store: &'a MemoStore<SqliteMemoRepository<'_>>,
    id: MemoId,
) -> anyhow::Result<&'a Memo> {
    store
        .memo(id)
        .ok_or_else(|| anyhow!("memo `{id}` not found"))
}

fn user_facing<T>(result: PersistenceResult<T>, locale: Locale) -> anyhow::Result<T> {
    result.map_err(|err| anyhow!(err.user_message(locale)))
}

fn print_row(memo: &Memo, locale: Locale) {
    let preview = preview_text(&memo.content, PREVIEW_CHARS).unwrap_or_default();
    println!(
        "{}\t[{}]\t{}\t{}",
        memo.id,
        category_label(memo.category, locale),
        memo.title,
        preview
    );
}

fn print_display(display: &ViewerDisplay) {
    println!("{}  [{}]", display.title, display.badge.label);
    println!("{}", display.created_label);
    if let Some(updated) = &display.updated_label {
        println!("{updated}");
    }
    println!();
    println!("{}", display.content);
    if !display.tags.is_empty() {
        println!();
        println!("{}", display.tags.join(" "));
    }
}

fn ask(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn delete_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::Ko => "정말로 이 메모를 삭제하시겠습니까?",
        Locale::En => "Delete this memo?",
    }
}

fn clear_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::Ko => "모든 메모를 삭제하시겠습니까?",
        Locale::En => "Delete every memo?",
    }
}
