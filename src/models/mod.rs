mod amount;
mod category;
mod entry;
mod history;
mod state;

pub(crate) use category::Category;
pub(crate) use entry::{Entry, EntryKind};
pub(crate) use history::HistoryRecord;
pub(crate) use state::LedgerState;

#[cfg(test)]
mod tests;
