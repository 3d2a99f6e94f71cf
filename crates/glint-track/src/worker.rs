use crate::{BoxReport, FrameRequest};
use glint_vision::FramePipeline;

/// Run one request through the pipeline off the async executor.
///
/// Inactive requests are skipped and produce no report. A rejected frame
/// still produces a report, with no box, so the sender is not left waiting.
pub(crate) async fn process_request(
    pipeline: FramePipeline,
    request: FrameRequest,
) -> Option<BoxReport> {
    let FrameRequest { seq, active, frame } = request;
    if !active {
        log::debug!("skipping frame {seq}, tracking inactive");
        return None;
    }

    let outcome = tokio::task::spawn_blocking(move || pipeline.process(&frame)).await;
    let bbox = match outcome {
        Ok(Ok(bbox)) => Some(bbox),
        Ok(Err(e)) => {
            log::error!("frame {seq} rejected: {e}");
            None
        }
        Err(e) => {
            log::error!("pipeline task for frame {seq} failed: {e}");
            None
        }
    };
    Some(BoxReport { seq, bbox })
}
