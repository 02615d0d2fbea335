/// Event contracts between the chat views.
pub mod events;
pub mod message_input;
pub mod message_list;
pub mod scroll_manager;
pub mod sidebar;
pub mod view;

pub use events::{
    DraftChanged, NewThreadRequested, SubmitRequested, ThreadSelected, VoiceCaptureFailed,
    VoiceCaptureRequested,
};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use scroll_manager::ScrollManager;
pub use sidebar::{ChatSidebar, SidebarRow, sidebar_rows};
pub use view::ChatView;
