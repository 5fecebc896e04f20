// Media URL helpers

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Rewrite a YouTube watch or short link into its embeddable form.
/// Anything else is returned unchanged.
pub fn youtube_embed_url(url: &str) -> String {
    let video_id = if url.contains("youtube.com/watch?v=") {
        url.split("v=").nth(1).and_then(|rest| rest.split('&').next())
    } else if url.contains("youtu.be/") {
        url.split("youtu.be/").nth(1).and_then(|rest| rest.split('?').next())
    } else {
        None
    };

    match video_id {
        Some(id) if !id.is_empty() => format!("{YOUTUBE_EMBED_BASE}{id}"),
        _ => url.to_string(),
    }
}
