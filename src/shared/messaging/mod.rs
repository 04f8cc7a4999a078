//! Messaging Module
//!
//! Direct messages between users. A message may reference a snippet by its
//! token so recipients can open it.
//!
//! # Usage
//!
//! ```rust
//! use codenest::shared::messaging::{DirectMessage, SendMessageRequest};
//! ```

pub mod message;

pub use message::{
    Direction, DirectMessage, ListMessagesResponse, MessageResponse, NewMessage,
    SendMessageRequest, SendMessageResponse,
};
