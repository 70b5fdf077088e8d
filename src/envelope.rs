use serde::Serialize;

/// Outcome flag carried by every enveloped response.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// `{ "status": ..., <body fields> }` wrapper used by most routes.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

impl<T: Serialize> Envelope<T> {
    pub fn success(body: T) -> Self {
        Self {
            status: Status::Success,
            body,
        }
    }
}

impl Envelope<Message> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            body: Message {
                message: message.into(),
            },
        }
    }

    pub fn success_message(message: impl Into<String>) -> Self {
        Self::success(Message {
            message: message.into(),
        })
    }
}

impl Envelope<Empty> {
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}
