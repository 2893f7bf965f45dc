use cw_model::Module;

/// Video manifest: one playback URL per line, in source order.
///
/// Uses the embed player URL when the provider is known, otherwise the
/// source URL as written.
pub fn to_video_list(module: &Module) -> String {
    module
        .videos()
        .map(|(_, video)| format!("{}\n", video.playback_url()))
        .collect()
}
