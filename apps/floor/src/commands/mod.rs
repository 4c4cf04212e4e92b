//! # Commands Module
//!
//! Operations a UI shell invokes on the floor.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Floor Commands                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐                      │
//! │  │   Floor Commands    │  │   Order Commands    │                      │
//! │  │  • get_floor        │  │  • get_menu         │                      │
//! │  │  • set_mode         │  │  • get_order        │                      │
//! │  │  • select_table     │  │  • add_product      │                      │
//! │  │  • move_table       │  │  • set_item_quantity│                      │
//! │  │  • save_layout      │  │  • increment_item   │                      │
//! │  └─────────────────────┘  │  • decrement_item   │                      │
//! │                           │  • remove_item      │                      │
//! │  ┌─────────────────────┐  └─────────────────────┘                      │
//! │  │  Billing Commands   │                                               │
//! │  │  • open_billing     │   • begin_split        • confirm_split        │
//! │  │  • select_payment_  │   • set_split_quantity • back_to_full_bill    │
//! │  │    method           │   • pay                • cancel_billing       │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns `Result<T, ApiError>` and takes the state it needs
//! explicitly.

pub mod billing;
pub mod floor;
pub mod order;
