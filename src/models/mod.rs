pub mod account;
pub mod chat;
pub mod intent;
pub mod reply;
pub mod search;

pub use account::{LoginRequest, RegisterRequest, UserProfile};
pub use chat::ChatRequest;
pub use intent::{Intent, IntentRecord};
pub use reply::{ComposedReply, ReplyFragment, ReplyKind};
pub use search::{FlightSearchParams, FlightSearchRequest, HotelSearchParams, HotelSearchRequest};
