mod blog_post;
mod donation;
mod engagement;
mod episode;
mod order;
mod poll;

pub use blog_post::*;
pub use donation::*;
pub use engagement::*;
pub use episode::*;
pub use order::*;
pub use poll::*;
