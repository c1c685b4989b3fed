pub mod backend;
pub mod compose;
pub mod config;
pub mod driver;
pub mod error;
pub mod expand;
pub mod fetch;
pub mod models;
pub mod pagination;
pub mod reactions;
pub mod session;
pub mod summary;
pub mod view;

pub use backend::BackendClient;
pub use compose::{compose, BoostedTopics, REGULAR_RUN_LENGTH};
pub use config::EngineConfig;
pub use driver::{spawn_driver, Command, DriverHandle, Event};
pub use error::FeedError;
pub use expand::{ExpandedQuery, QueryExpander};
pub use fetch::FeedFetcher;
pub use models::{Article, Category, CategoryFilter, FeedbackRecord, Reaction, ReactionFilter, Tab};
pub use pagination::{Pagination, ScrollOutcome, PAGE_SIZE};
pub use reactions::{ReactionStore, SavedItems, Transition};
pub use session::{FeedSession, FeedSessionState, SearchOutcome, SearchTicket};
pub use summary::{SummaryCache, SummaryEntry, SUMMARY_FALLBACK};
pub use view::{FeedView, ViewFilters, ViewItem};
