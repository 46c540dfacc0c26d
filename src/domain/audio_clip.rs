use super::InputError;

pub const DEFAULT_MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Uploaded audio that passed the content-type and size checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    data: Vec<u8>,
    mime: String,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, mime: &str, max_bytes: usize) -> Result<Self, InputError> {
        if !is_audio_mime(mime) {
            return Err(InputError::UnsupportedMediaType(mime.to_string()));
        }
        if data.is_empty() {
            return Err(InputError::EmptyAudio);
        }
        if data.len() > max_bytes {
            return Err(InputError::TooLarge {
                size: data.len(),
                max: max_bytes,
            });
        }
        Ok(Self {
            data,
            mime: mime.to_string(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn is_audio_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("audio/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_audio_mime_when_creating_then_accepted() {
        let clip = AudioClip::new(vec![1, 2, 3], "audio/wav", DEFAULT_MAX_AUDIO_BYTES).unwrap();
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.mime(), "audio/wav");
    }

    #[test]
    fn given_uppercase_audio_mime_when_creating_then_accepted() {
        assert!(AudioClip::new(vec![0], "Audio/MPEG", DEFAULT_MAX_AUDIO_BYTES).is_ok());
    }

    #[test]
    fn given_non_audio_mime_when_creating_then_rejected() {
        assert_eq!(
            AudioClip::new(vec![0], "image/png", DEFAULT_MAX_AUDIO_BYTES),
            Err(InputError::UnsupportedMediaType("image/png".to_string()))
        );
    }

    #[test]
    fn given_empty_data_when_creating_then_rejected() {
        assert_eq!(
            AudioClip::new(Vec::new(), "audio/wav", DEFAULT_MAX_AUDIO_BYTES),
            Err(InputError::EmptyAudio)
        );
    }

    #[test]
    fn given_data_over_limit_when_creating_then_rejected() {
        assert_eq!(
            AudioClip::new(vec![0; 11], "audio/wav", 10),
            Err(InputError::TooLarge { size: 11, max: 10 })
        );
    }
}
