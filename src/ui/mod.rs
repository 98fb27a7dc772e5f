pub mod loading;
pub mod markdown;
pub mod notifications;
pub mod particles;
pub mod render;
pub mod screenshot;
pub mod theme;
