use super::Station;
use crate::error::{Error, Result};
use crate::types::{Broadcast, ProgramRef, ProgressFn};
use async_trait::async_trait;

/// Kol-Barama placeholder
///
/// Listed so users can see the station exists; both operations return
/// [`Error::NotSupported`].
pub struct KolBaramaStation;

#[async_trait]
impl Station for KolBaramaStation {
    fn name(&self) -> &'static str {
        "Kol-Barama"
    }

    async fn load_programs(&self) -> Result<Vec<String>> {
        Err(Error::NotSupported(
            "Kol-Barama program listing is not implemented".into(),
        ))
    }

    async fn load_broadcasts(
        &self,
        _program: &ProgramRef,
        _progress: Option<&ProgressFn>,
    ) -> Result<Vec<Broadcast>> {
        Err(Error::NotSupported(
            "Kol-Barama broadcast listing is not implemented".into(),
        ))
    }
}
