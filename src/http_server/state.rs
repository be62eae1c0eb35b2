use std::sync::Arc;

use crate::ports::youtube::YoutubeApi;
use crate::services::isrc_lookup::IsrcLookupService;
use crate::services::recommendation::RecommendationService;
use crate::timeline::TimelineExtractor;

pub struct AppState {
    pub youtube: Arc<dyn YoutubeApi>,
    pub isrc_lookup: IsrcLookupService,
    pub recommendations: RecommendationService,
    pub extractor: TimelineExtractor,
}
