pub mod extract;
pub mod isrc;
pub mod reco;
pub mod videos;
pub mod youtube_search;
