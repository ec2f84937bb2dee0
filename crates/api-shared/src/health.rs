use crate::models::MessageRes;

/// Greeting returned by the service root.
pub const WELCOME_MESSAGE: &str = "Welcome to Patient Management API";

/// Liveness/info service for the API root.
///
/// Holds no state; the message is static so load balancers and humans get the same answer.
#[derive(Clone, Debug, Default)]
pub struct HomeService;

impl HomeService {
    /// Creates a new instance of HomeService.
    pub fn new() -> Self {
        Self
    }

    /// Returns the static liveness message.
    ///
    /// # Returns
    /// A `MessageRes` carrying the welcome text.
    pub fn welcome() -> MessageRes {
        MessageRes {
            message: WELCOME_MESSAGE.into(),
        }
    }
}
