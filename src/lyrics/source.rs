use async_trait::async_trait;

/// Outcome of asking one source for lyrics.
///
/// "Not found" and "source broken" are the same value; `reason` is only
/// there for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Raw lyric text, LRC or plain
    Found(String),
    Absent { reason: Option<String> },
}

impl Lookup {
    pub fn absent() -> Self {
        Self::Absent { reason: None }
    }

    /// Fold a provider's fallible result into a lookup. Empty text is absence.
    pub fn from_result(result: anyhow::Result<Option<String>>) -> Self {
        match result {
            Ok(Some(text)) if !text.is_empty() => Self::Found(text),
            Ok(_) => Self::absent(),
            Err(e) => Self::Absent {
                reason: Some(format!("{e:#}")),
            },
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Found(text) => Some(text),
            Self::Absent { .. } => None,
        }
    }
}

/// Anything that can answer a (track, artist) lyrics lookup.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Stable identifier, stamped onto results as their source
    fn name(&self) -> &str;

    /// Never fails: transport errors are reported as [`Lookup::Absent`].
    async fn get_lyrics(&self, track: &str, artist: &str) -> Lookup;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        assert_eq!(
            Lookup::from_result(Ok(Some("[00:01.00]hi".to_string()))),
            Lookup::Found("[00:01.00]hi".to_string())
        );
        assert_eq!(Lookup::from_result(Ok(None)), Lookup::absent());
        assert_eq!(Lookup::from_result(Ok(Some(String::new()))), Lookup::absent());

        let failed = Lookup::from_result(Err(anyhow::anyhow!("timed out")));
        assert_eq!(
            failed,
            Lookup::Absent {
                reason: Some("timed out".to_string())
            }
        );
        assert!(failed.into_text().is_none());
    }
}
