pub mod booking;
pub mod calculator;
pub mod copy_button;
pub mod dropdown;
pub mod feedback;
pub mod hero;
pub mod menu;
pub mod modal;
pub mod password_toggle;
pub mod phone_mask;
pub mod reset_notice;
pub mod reveal;
pub mod slider;
pub mod tabs;

pub use modal::ModalController;
