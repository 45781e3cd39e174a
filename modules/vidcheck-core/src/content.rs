//! Content fetch: metadata unconditionally, transcript opportunistically.

use tracing::{debug, info};

use vidcheck_common::{Fetch, VideoContent, VideoRef};

use crate::deps::PipelineDeps;
use crate::guard::guarded;

pub async fn fetch_content(deps: &PipelineDeps, video: &VideoRef) -> Fetch<VideoContent> {
    let policy = deps.call_policy();

    let mut content = match guarded("video_metadata", policy, || deps.videos.fetch_metadata(video)).await {
        Fetch::Ok(content) => content,
        Fetch::Unavailable(reason) => return Fetch::Unavailable(reason),
    };

    if content.transcript.is_none() {
        match guarded("video_transcript", policy, || deps.videos.fetch_transcript(video)).await {
            Fetch::Ok(transcript) => content.transcript = transcript,
            Fetch::Unavailable(reason) => debug!(reason = %reason, "Transcript unavailable"),
        }
    }

    // Blank transcripts carry no signal.
    if content
        .transcript
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        content.transcript = None;
    }

    info!(
        platform = video.platform.as_str(),
        video_id = %video.video_id,
        has_transcript = content.transcript.is_some(),
        "Content fetched"
    );
    Fetch::Ok(content)
}
