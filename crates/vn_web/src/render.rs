//! Reflow of stored plain-text content into display HTML.
//!
//! Paragraphs come from the blank-line separators the pipeline stored;
//! single-block content is re-split by sentence packing. Hosted images are
//! interleaved at paragraph intervals. With exactly one image it is placed
//! once mid-article no matter how many paragraphs there are; with four or
//! more, roughly 70% go inline and the rest are left for a trailing
//! gallery.

const GALLERY_THRESHOLD: usize = 4;
const PARAGRAPH_TARGET_LEN: usize = 500;

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Pack sentences into paragraphs of roughly `max_length` characters.
fn split_by_length(text: &str, max_length: usize) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    for sentence in split_sentences(text) {
        if current.len() + sentence.len() < max_length {
            current.push_str(&sentence);
            current.push(' ');
        } else {
            if !current.trim().is_empty() {
                paragraphs.push(current.trim().to_string());
            }
            current = sentence;
            current.push(' ');
        }
    }
    if !current.trim().is_empty() {
        paragraphs.push(current.trim().to_string());
    }
    paragraphs
}

fn figure(src: &str, alt: &str, caption: Option<&str>) -> String {
    match caption {
        Some(caption) => format!(
            "<figure class=\"flex flex-col items-center my-6\">\
<img src=\"{src}\" alt=\"{alt}\" class=\"max-w-full mx-auto rounded-lg shadow-md\" />\
<figcaption class=\"text-center text-gray-600 mt-2\">{caption}</figcaption>\
</figure>"
        ),
        None => format!(
            "<figure class=\"flex flex-col items-center\">\
<img src=\"{src}\" alt=\"{alt}\" class=\"max-w-full mx-auto rounded-lg shadow-md\" />\
</figure>"
        ),
    }
}

/// Number of images rendered inline; the remainder belongs to the gallery.
pub fn inline_image_count(total_images: usize) -> usize {
    if total_images >= GALLERY_THRESHOLD {
        (total_images as f64 * 0.7).ceil() as usize
    } else {
        total_images
    }
}

pub fn enhance_content(content: &str, images: &[String], title: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let mut paragraphs: Vec<String> = content.split("\n\n").map(str::to_string).collect();
    if paragraphs.len() <= 1 {
        paragraphs = split_by_length(content, PARAGRAPH_TARGET_LEN);
    }

    let inline_count = inline_image_count(images.len());
    let paragraphs_per_image = (paragraphs.len() / inline_count.max(1)).max(2);

    let alt = if title.is_empty() { "Article image" } else { title };
    let caption = if title.is_empty() { "this article" } else { title };

    let mut result = String::new();
    let mut image_index = 0usize;
    let mut single_inserted = false;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let trimmed = paragraph.trim();
        if !trimmed.is_empty() {
            result.push_str(&format!("<p>{}</p>", trimmed));
        }

        // One image: place it once, right after the opening paragraph.
        if images.len() == 1 && !single_inserted {
            result.push_str(&figure(&images[0], alt, Some(caption)));
            single_inserted = true;
            image_index = 1;
        }

        let should_insert = images.len() > 1
            && index > 0
            && (index + 1) % paragraphs_per_image == 0
            && image_index < inline_count;

        if should_insert {
            if image_index + 1 < inline_count
                && image_index + 1 < images.len()
                && image_index % 2 == 1
            {
                result.push_str(&format!(
                    "<div class=\"grid grid-cols-1 md:grid-cols-2 gap-4 my-6\">{}{}</div>",
                    figure(&images[image_index], alt, None),
                    figure(&images[image_index + 1], alt, None)
                ));
                image_index += 2;
            } else {
                result.push_str(&figure(&images[image_index], alt, Some(caption)));
                image_index += 1;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://cdn.test/{}.jpg", i)).collect()
    }

    fn count_figures(html: &str) -> usize {
        html.matches("<figure").count()
    }

    #[test]
    fn test_no_images_only_paragraphs() {
        let html = enhance_content("Đoạn một.\n\nĐoạn hai.", &[], "Bài");
        assert_eq!(html, "<p>Đoạn một.</p><p>Đoạn hai.</p>");
    }

    #[test]
    fn test_single_image_single_figure_regardless_of_paragraphs() {
        for paragraphs in [1usize, 3, 7, 20] {
            let content = vec!["Một đoạn văn."; paragraphs].join("\n\n");
            let html = enhance_content(&content, &urls(1), "Bài viết");
            assert_eq!(count_figures(&html), 1, "paragraphs: {}", paragraphs);
            assert!(html.contains("https://cdn.test/0.jpg"));
            assert!(html.contains("<figcaption"));
        }
    }

    #[test]
    fn test_multiple_images_interleaved() {
        let content = vec!["Câu chuyện tiếp tục ở đây."; 8].join("\n\n");
        let html = enhance_content(&content, &urls(2), "Bài");
        assert_eq!(count_figures(&html), 2);
        assert!(html.contains("https://cdn.test/0.jpg"));
        assert!(html.contains("https://cdn.test/1.jpg"));
    }

    #[test]
    fn test_gallery_threshold_keeps_images_back() {
        let content = vec!["Một đoạn đủ dài để chèn ảnh."; 20].join("\n\n");
        let html = enhance_content(&content, &urls(10), "Bài");
        // 70% of 10 inline, the rest reserved for the gallery
        assert_eq!(inline_image_count(10), 7);
        assert!(count_figures(&html) <= 7);
        assert!(!html.contains("https://cdn.test/9.jpg"));
    }

    #[test]
    fn test_long_single_block_is_resplit() {
        let sentence = "Đây là một câu tương đối dài để kiểm tra việc chia đoạn. ";
        let content = sentence.repeat(30);
        let html = enhance_content(&content, &[], "Bài");
        assert!(html.matches("<p>").count() > 1);
    }

    #[test]
    fn test_empty_content_yields_empty_html() {
        assert_eq!(enhance_content("", &urls(3), "Bài"), "");
        assert_eq!(enhance_content("   ", &urls(1), ""), "");
    }
}
