use thiserror::Error;

/// Error taxonomy for the posting core. Every variant is local to the single
/// triggering event; none is fatal to the process.
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Invalid input: {0}")]
    UserInput(String),

    #[error("Bot lacks posting rights in channel {channel_id}")]
    Permission { channel_id: i64 },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Distribution failed: {0}")]
    Distribution(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, PostError>;

impl PostError {
    /// Short user-visible text for callback-query alerts and replies.
    pub fn user_message(&self) -> String {
        match self {
            PostError::UserInput(msg) => format!("⚠️ {}", msg),
            PostError::Permission { .. } => {
                "⚠️ I am not an admin in that channel, so I cannot post there.".to_string()
            }
            PostError::NotFound(what) => format!("⚠️ No {} found!", what),
            PostError::Distribution(_) => "❌ Failed to post!".to_string(),
            PostError::Database(_) => "❌ Something went wrong, please try again.".to_string(),
        }
    }
}
