//! Source identifiers.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Channel identifier (`UC...`).
    pub struct ChannelId;
}

define_newtype_string! {
    /// Video identifier.
    pub struct VideoId;
}

define_newtype_string! {
    /// Playlist identifier. The channel's uploads playlist is one of these too.
    pub struct PlaylistId;
}

impl ChannelId {
    /// Public channel page URL
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.0)
    }
}

impl VideoId {
    /// Public watch URL
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl PlaylistId {
    /// Public playlist URL
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/playlist?list={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(VideoId::try_new("").is_none());
        assert_eq!(VideoId::try_new("abc").unwrap(), "abc");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        use serde::Deserialize;

        let empty: StrDeserializer<'_, Error> = "".into_deserializer();
        assert!(PlaylistId::deserialize(empty).is_err());

        let valid: StrDeserializer<'_, Error> = "PLabc".into_deserializer();
        assert_eq!(PlaylistId::deserialize(valid).unwrap(), "PLabc");
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            VideoId::new("dQw4w9WgXcQ").url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            ChannelId::new("UC123").url(),
            "https://www.youtube.com/channel/UC123"
        );
        assert_eq!(
            PlaylistId::new("PL9").url(),
            "https://www.youtube.com/playlist?list=PL9"
        );
    }
}
