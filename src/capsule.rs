//! The capsule record handed over by the host app, and message-source selection.

/// Characters a polaroid message may hold.
pub const POLAROID_MESSAGE_LIMIT: usize = 500;

/// A capsule as stored by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_art_url: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub song_meaning: Option<String>,
}

/// Which capsule field supplies the keepsake text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    #[default]
    Message,
    SongMeaning,
}

impl MessageSource {
    pub fn other(self) -> Self {
        match self {
            MessageSource::Message => MessageSource::SongMeaning,
            MessageSource::SongMeaning => MessageSource::Message,
        }
    }
}

/// Text chosen by [`Capsule::resolve_message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub text: String,
    /// Field the text came from; differs from the request when it was forced.
    pub source: MessageSource,
    /// `true` when the text had to be cut at the limit.
    pub truncated: bool,
}

impl Capsule {
    /// Raw text of `source` (empty when the field is unset).
    pub fn text_for(&self, source: MessageSource) -> &str {
        match source {
            MessageSource::Message => &self.message,
            MessageSource::SongMeaning => self.song_meaning.as_deref().unwrap_or(""),
        }
    }

    /// Pick the keepsake text.
    ///
    /// With a `limit`, a chosen source longer than the limit is swapped for the other source
    /// when that one is non-empty and fits; otherwise the chosen text is cut at the limit.
    /// Without a limit the chosen text is returned as is.
    pub fn resolve_message(&self, source: MessageSource, limit: Option<usize>) -> ResolvedMessage {
        let chosen = self.text_for(source);
        let Some(limit) = limit else {
            return ResolvedMessage {
                text: chosen.to_owned(),
                source,
                truncated: false,
            };
        };
        if chosen.chars().count() <= limit {
            return ResolvedMessage {
                text: chosen.to_owned(),
                source,
                truncated: false,
            };
        }
        let other = self.text_for(source.other());
        if !other.trim().is_empty() && other.chars().count() <= limit {
            tracing::debug!(?source, "message source over limit, using the other source");
            return ResolvedMessage {
                text: other.to_owned(),
                source: source.other(),
                truncated: false,
            };
        }
        ResolvedMessage {
            text: chosen.chars().take(limit).collect(),
            source,
            truncated: true,
        }
    }

    /// Sender if set and non-blank.
    pub fn sender(&self) -> Option<&str> {
        self.sender_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[path = "../tests/unit/capsule.rs"]
mod tests;
