use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use feed_core::{
    Command, CategoryFilter, DriverHandle, Event, FeedView, Reaction, ReactionFilter,
    ScrollOutcome, SearchOutcome, Tab,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

const HELP: &str = "\
commands:
  search <terms>          run a search
  more                    reveal more results (asks before the second page)
  continue                keep scrolling after the prompt
  suggest [n]             search suggested topic n (random when omitted)
  like|dislike|save|hide <n>
                          toggle a reaction on item n of the current view
  summary <n>             TL;DR of item n
  refresh                 reload reactions from the server
  tab feed|saved          switch list
  filter all|like|dislike|save|hide
  category all|News|Grant|Gov Opportunity|Think Tank|International|Other
  help, quit";

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub driver: DriverHandle,
    pub events: mpsc::Receiver<Event>,
    pub suggestions: Vec<String>,
}

pub struct TerminalApp {
    runtime: Arc<Runtime>,
    driver: DriverHandle,
    last_view: Arc<Mutex<Option<FeedView>>>,
    suggestions: Vec<String>,
}

enum Input {
    Command(Command),
    Help,
    Quit,
}

impl TerminalApp {
    pub fn new(init: AppInit) -> Self {
        let last_view = Arc::new(Mutex::new(None));
        let printer = PrintState {
            last_view: last_view.clone(),
            suggestions: init.suggestions.clone(),
        };
        init.runtime.spawn(render_events(init.events, printer));

        Self {
            runtime: init.runtime,
            driver: init.driver,
            last_view,
            suggestions: init.suggestions,
        }
    }

    pub fn run(self) -> io::Result<()> {
        println!("GovTech Feed. Type `help` for commands.");
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            let parsed = {
                let view = self.last_view.lock().unwrap_or_else(|e| e.into_inner());
                parse_input(&line, view.as_ref())
            };
            match parsed {
                Ok(Some(Input::Command(command))) => {
                    if let Err(err) = self.runtime.block_on(self.driver.send(command)) {
                        eprintln!("engine stopped: {err}");
                        break;
                    }
                }
                Ok(Some(Input::Help)) => {
                    println!("{HELP}");
                    println!("suggested topics: {}", numbered(&self.suggestions));
                }
                Ok(Some(Input::Quit)) => break,
                Ok(None) => {}
                Err(message) => println!("{message}"),
            }
            io::stdout().flush()?;
        }

        self.runtime
            .block_on(self.driver.stop())
            .map_err(io::Error::other)
    }
}

fn parse_input(line: &str, view: Option<&FeedView>) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "quit" | "exit" => return Ok(Some(Input::Quit)),
        "help" | "?" => return Ok(Some(Input::Help)),
        "search" => Command::Search(rest.to_owned()),
        "more" => Command::NearBottom,
        "refresh" => Command::ReloadFeedback,
        "continue" => Command::ContinueScrolling,
        "suggest" => {
            let choice = if rest.is_empty() {
                None
            } else {
                Some(parse_index(rest)?)
            };
            Command::TrySuggestedTopic(choice)
        }
        "summary" => Command::Summarize(link_at(view, rest)?),
        "tab" => match rest.to_ascii_lowercase().as_str() {
            "feed" => Command::SelectTab(Tab::Feed),
            "saved" => Command::SelectTab(Tab::Saved),
            other => return Err(format!("unknown tab: {other}")),
        },
        "filter" => Command::SetReactionFilter(rest.parse::<ReactionFilter>()?),
        "category" => Command::SetCategoryFilter(rest.parse::<CategoryFilter>()?),
        other => match other.parse::<Reaction>() {
            Ok(reaction) => Command::Toggle {
                link: link_at(view, rest)?,
                reaction,
            },
            Err(_) => return Err(format!("unknown command `{other}`; try `help`")),
        },
    };
    Ok(Some(Input::Command(command)))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("expected an item number, got `{raw}`"))
}

fn link_at(view: Option<&FeedView>, raw: &str) -> Result<String, String> {
    let index = parse_index(raw)?;
    view.and_then(|view| view.items.get(index))
        .map(|item| item.article.link.clone())
        .ok_or_else(|| format!("no item {raw} in the current view"))
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}

struct PrintState {
    last_view: Arc<Mutex<Option<FeedView>>>,
    suggestions: Vec<String>,
}

async fn render_events(mut events: mpsc::Receiver<Event>, printer: PrintState) {
    while let Some(event) = events.recv().await {
        match event {
            Event::View(view) => {
                render_view(&view, &printer.suggestions);
                *printer.last_view.lock().unwrap_or_else(|e| e.into_inner()) = Some(view);
            }
            Event::SearchFinished { query, outcome } => match outcome {
                SearchOutcome::Applied { count } => println!("-- {count} articles for \"{query}\""),
                SearchOutcome::Superseded => {}
            },
            Event::Scrolled(ScrollOutcome::PromptShown) => {
                println!("-- Keep scrolling? `continue`, or `suggest [n]`: {}", numbered(&printer.suggestions));
            }
            Event::Scrolled(ScrollOutcome::Exhausted) => println!("-- end of results"),
            Event::Scrolled(ScrollOutcome::Grew(_)) => {}
            Event::Summary { link, entry } => {
                if entry.is_pending() {
                    println!("-- still summarizing {link}");
                } else if let Some(text) = entry.display_text() {
                    println!("TL;DR {link}\n{text}\n");
                }
            }
            Event::SyncFailed { link } => {
                eprintln!("(reaction on {link} not saved on the server; it stays applied locally)");
            }
        }
    }
}

fn render_view(view: &FeedView, suggestions: &[String]) {
    if view.is_loading && view.items.is_empty() {
        println!("loading...");
        return;
    }
    let tab = match view.tab {
        Tab::Feed => "Feed",
        Tab::Saved => "Saved",
    };
    println!("== {tab} ({} of {})", view.items.len(), view.total_matching);
    for (i, item) in view.items.iter().enumerate() {
        let article = &item.article;
        let date = article
            .published
            .map(|published| published.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let mark = item.reaction.map(|r| format!(" [{r}]")).unwrap_or_default();
        println!(
            "{:>3}. [{}] {}{mark}  {date}",
            i + 1,
            article.category.label().to_uppercase(),
            article.title
        );
        let preview = article.plain_description();
        if !preview.is_empty() {
            let short: String = preview.chars().take(160).collect();
            println!("     {short}");
        }
        println!("     {}", article.link);
    }
    if view.no_results && view.tab == Tab::Saved {
        println!("No saved articles yet.");
    } else if view.no_results {
        println!("No results found for \"{}\". Try a different topic below.", view.query);
        println!("Suggested topics: {}", numbered(suggestions));
    } else if view.show_continue_options {
        println!("-- `continue` to keep scrolling or `suggest [n]` for a new topic");
    } else if view.has_more() {
        println!("-- `more` for the next page");
    }
}
