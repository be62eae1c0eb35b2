pub mod isrc_lookup;
pub mod recommendation;
pub mod spotify;
pub mod youtube;
