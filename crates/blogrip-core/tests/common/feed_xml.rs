//! Builders for `/api/read` feed documents.

pub fn page(posts: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tumblr version=\"1.0\"><tumblelog name=\"test\"/><posts start=\"0\" total=\"{}\">{}</posts></tumblr>",
        posts.len(),
        posts.concat()
    )
}

/// A page past the end of the feed.
pub fn empty_page() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tumblr version=\"1.0\"><posts start=\"200\" total=\"0\"/></tumblr>".to_string()
}

pub fn photo_post(id: u32, url: &str) -> String {
    format!(
        "<post id=\"{}\" type=\"photo\"><photo-url max-width=\"1280\">{}</photo-url><photo-url max-width=\"500\">{}.small</photo-url></post>",
        id,
        escape(url),
        escape(url)
    )
}

/// A post whose cover photo is `cover` and whose photo set holds `urls`.
pub fn photoset_post(id: u32, cover: &str, urls: &[&str]) -> String {
    let photos: String = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            format!(
                "<photo offset=\"o{}\"><photo-url max-width=\"1280\">{}</photo-url></photo>",
                i + 1,
                escape(url)
            )
        })
        .collect();
    format!(
        "<post id=\"{}\" type=\"photo\"><photo-url max-width=\"1280\">{}</photo-url><photoset>{}</photoset></post>",
        id,
        escape(cover),
        photos
    )
}

/// A post with no photo URL at all.
pub fn bare_post(id: u32) -> String {
    format!("<post id=\"{}\" type=\"photo\"><photo-caption>nothing</photo-caption></post>", id)
}

/// A video post with a small placeholder player followed by `player`.
pub fn video_post(id: u32, player: &str) -> String {
    format!(
        "<post id=\"{}\" type=\"video\"><video-player>{}</video-player><video-player max-width=\"500\">{}</video-player></post>",
        id,
        escape("<iframe></iframe>"),
        escape(player)
    )
}

/// Player snippet declaring an HD URL (slashes JSON-escaped as the platform does).
pub fn hd_player(url: &str) -> String {
    format!(
        "<video data-crt-options='{{\"hdUrl\":\"{}\",\"filmstrip\":false}}'><source src=\"{}.sd\" type=\"video/mp4\"></video>",
        url.replace('/', "\\/"),
        url
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
