pub mod sheets;

pub use sheets::SheetsStore;

use anyhow::Result;

/// How the store should interpret written cells. `UserEntered` lets the
/// sheet auto-type dates and numbers instead of storing quoted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInput {
    Raw,
    UserEntered,
}

impl ValueInput {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueInput::Raw => "RAW",
            ValueInput::UserEntered => "USER_ENTERED",
        }
    }
}

/// A table store that only knows how to be read whole, wiped, and rewritten
/// whole. The first row of the payload is the header. No partial updates,
/// no transactions, no concurrent-writer protection.
pub trait TableStore {
    fn read_all(&self) -> impl std::future::Future<Output = Result<Vec<Vec<String>>>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_all(
        &self,
        rows: &[Vec<String>],
        input: ValueInput,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// In-memory store used by pipeline tests. Clones share the same rows so
/// a test can hand one clone to the pipeline and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    rows: std::sync::Arc<std::sync::Mutex<Vec<Vec<String>>>>,
}

impl MemStore {
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        MemStore {
            rows: std::sync::Arc::new(std::sync::Mutex::new(rows)),
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

impl TableStore for MemStore {
    async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<()> {
        self.rows.lock().unwrap().clear();
        Ok(())
    }

    async fn write_all(&self, rows: &[Vec<String>], _input: ValueInput) -> Result<()> {
        *self.rows.lock().unwrap() = rows.to_vec();
        Ok(())
    }
}
