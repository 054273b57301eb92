//! Text cleanup and sliding-window chunking.

/// Remove NUL bytes and collapse all whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    let without_nul = text.replace('\0', "");
    without_nul.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into overlapping chunks of roughly `chunk_size` characters.
///
/// When a window does not end at the text boundary, the split prefers the
/// last newline inside the window, provided it falls in the window's latter
/// half. The window then advances by `chunk_size - overlap`, always at least
/// one character, so pathological `overlap >= chunk_size` inputs still
/// terminate. Never emits empty chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let mut end = (start + chunk_size).min(total);

        // Look for a nicer break point unless we are at the very end.
        if end < total {
            if let Some(pos) = chars[start..end].iter().rposition(|&c| c == '\n') {
                // Only split there if the newline is in the latter half of
                // the window; otherwise the chunk would be degenerate.
                if pos * 2 > chunk_size {
                    end = start + pos + 1;
                }
            }
        }

        let len = end - start;
        chunks.push(chars[start..end].iter().collect());

        let step = len.saturating_sub(overlap);
        start += if step == 0 { len } else { step };
    }

    chunks
}
