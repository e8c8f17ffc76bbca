//! Stage that looks up a review video for the best product.

use std::sync::Arc;

use async_trait::async_trait;
use providers::VideoSearch;
use shop_state::ShopState;
use tracing::{error, info, warn};

use crate::traits::Stage;

/// Writes `youtube_link`.
pub struct VideoLookupStage {
    videos: Arc<dyn VideoSearch>,
}

impl VideoLookupStage {
    pub fn new(videos: Arc<dyn VideoSearch>) -> Self {
        Self { videos }
    }
}

#[async_trait]
impl Stage for VideoLookupStage {
    fn name(&self) -> &str {
        "video_lookup"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        let Some(name) = state.best_product_name() else {
            info!("No best product available; video lookup skipped");
            state.youtube_link = None;
            return state;
        };

        let query = format!("{name} review");
        let result = self.videos.search(&query, 1).await;
        state.youtube_link = match result {
            Ok(hits) => match hits.first() {
                Some(hit) => {
                    info!("Review video for {:?}: {}", query, hit.title);
                    Some(hit.watch_url())
                }
                None => {
                    warn!("No review video found for {:?}", query);
                    None
                }
            },
            Err(e) => {
                error!("Error during video lookup: {}", e);
                None
            }
        };
        state
    }
}
