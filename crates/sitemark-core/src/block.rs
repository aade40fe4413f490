use crate::ast::BlockType;
use crate::error::ParseError;

pub(crate) const FENCE: &str = "```";

/// Splits raw markdown into an ordered sequence of typed block strings.
///
/// The input is trimmed first; empty or whitespace-only input yields an
/// empty sequence. Each step dispatches on the leading characters of the
/// trimmed remainder, first match wins: fenced code, heading, quote,
/// unordered list, ordered list, paragraph.
pub fn segment(markdown: &str) -> Result<Vec<String>, ParseError> {
    let mut blocks = Vec::new();
    let mut rest = markdown.trim();

    while !rest.is_empty() {
        let next = if rest.starts_with(FENCE) {
            let (block, next) = take_fenced_code(rest)?;
            blocks.push(block);
            next
        } else if let Some((block, next)) = take_heading(rest) {
            blocks.push(block);
            next
        } else if rest.starts_with('>') {
            let (block, next) = take_quote(rest);
            blocks.push(block);
            next
        } else if rest.starts_with("* ") || rest.starts_with("- ") {
            let (block, next) = take_unordered_list(rest);
            blocks.push(block);
            next
        } else if rest.starts_with("1. ") {
            let (block, next) = take_ordered_list(rest);
            blocks.push(block);
            next
        } else {
            // Default: paragraph accumulation. A `#` line that failed the
            // heading count/space rule lands here instead of being dropped.
            let (block, next) = take_paragraph(rest);
            if !block.is_empty() {
                blocks.push(block);
            }
            next
        };
        rest = next.trim();
    }

    Ok(blocks)
}

/// Determines the structural type of one block. Total: anything that fails
/// a stricter rule falls back to `Paragraph`.
pub fn classify(block: &str) -> BlockType {
    if block.starts_with(FENCE) && block.ends_with(FENCE) {
        return BlockType::Code;
    }

    if block.starts_with('#') {
        let count = block.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&count) && block.as_bytes().get(count) == Some(&b' ') {
            return BlockType::Heading;
        }
        return BlockType::Paragraph;
    }

    if block.starts_with('>') {
        let all_quoted = block
            .lines()
            .filter(|line| !line.is_empty())
            .all(|line| line.starts_with('>'));
        if all_quoted {
            return BlockType::Quote;
        }
        return BlockType::Paragraph;
    }

    if block.starts_with("* ") || block.starts_with("- ") {
        // Mixing `*` and `-` markers invalidates the whole block.
        let prefix = &block[..2];
        let consistent = block
            .lines()
            .filter(|line| !line.is_empty())
            .all(|line| line.starts_with(prefix));
        if consistent {
            return BlockType::UnorderedList;
        }
        return BlockType::Paragraph;
    }

    if block.starts_with("1. ") {
        let mut expected = 1u64;
        for line in block.lines() {
            if line.is_empty() {
                continue;
            }
            if !line.starts_with(&format!("{expected}. ")) {
                return BlockType::Paragraph;
            }
            expected += 1;
        }
        return BlockType::OrderedList;
    }

    BlockType::Paragraph
}

/// A line has the `<digits>. <content>` shape of an ordered-list item.
/// Strict 1,2,3 numbering is the classifier's job, not the segmenter's.
pub(crate) fn is_ordered_item(line: &str) -> bool {
    match line.split_once('.') {
        Some((digits, tail)) => {
            let digits = digits.trim();
            !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
                && tail.starts_with(' ')
        }
        None => false,
    }
}

fn take_fenced_code(rest: &str) -> Result<(String, &str), ParseError> {
    let close = rest[FENCE.len()..]
        .find(FENCE)
        .ok_or_else(|| ParseError::UnclosedBlock(preview(rest)))?;
    let end = (close + 2 * FENCE.len()).min(rest.len());
    let block = rest[..end].to_string();

    let next = rest[end..].trim();
    if next.starts_with(FENCE) && next != FENCE {
        return Err(ParseError::UnclosedBlock(preview(next)));
    }
    // A lone stray closing fence after the block is swallowed.
    let next = if next == FENCE { "" } else { next };
    Ok((block, next))
}

fn take_heading(rest: &str) -> Option<(String, &str)> {
    let count = rest.chars().take_while(|&c| c == '#').count();
    if count == 0 || count > 6 || rest.as_bytes().get(count) != Some(&b' ') {
        return None;
    }
    let (line, next) = match rest.find('\n') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };
    let content = line[count + 1..].trim();
    Some((format!("{} {}", "#".repeat(count), content), next))
}

fn take_quote(rest: &str) -> (String, &str) {
    let mut lines = Vec::new();
    for line in rest.lines() {
        if line.starts_with('>') {
            lines.push(line.trim());
        } else {
            break;
        }
    }
    let next = skip_lines(rest, lines.len());
    (lines.join("\n"), next)
}

fn take_unordered_list(rest: &str) -> (String, &str) {
    let prefix = &rest[..2];
    take_list_lines(rest, |line| line.starts_with(prefix))
}

fn take_ordered_list(rest: &str) -> (String, &str) {
    take_list_lines(rest, is_ordered_item)
}

/// Consumes consecutive list-item lines. One blank line mid-list is kept;
/// two consecutive blank lines or any other non-matching line terminate.
fn take_list_lines(rest: &str, is_item: impl Fn(&str) -> bool) -> (String, &str) {
    let all: Vec<&str> = rest.split('\n').collect();
    let mut lines: Vec<&str> = Vec::new();
    let mut blanks = 0;
    let mut i = 0;

    while i < all.len() {
        let line = all[i];
        if line.is_empty() {
            blanks += 1;
            if blanks >= 2 {
                break;
            }
            if !lines.is_empty() {
                lines.push("");
            }
        } else if is_item(line) {
            blanks = 0;
            lines.push(line);
        } else {
            break;
        }
        i += 1;
    }

    let block = lines.join("\n").trim().to_string();
    let next = if i < all.len() {
        skip_lines(rest, i)
    } else {
        ""
    };
    (block, next)
}

fn take_paragraph(rest: &str) -> (String, &str) {
    let all: Vec<&str> = rest.split('\n').collect();
    let mut lines: Vec<&str> = Vec::new();

    for (i, raw) in all.iter().enumerate() {
        let line = raw.trim();
        // The first line is consumed unconditionally so a marker-shaped line
        // the dispatcher declined (e.g. `2. x`) cannot loop forever.
        if i > 0 && starts_block(line) {
            return (lines.join("\n"), skip_lines(rest, i));
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    (lines.join("\n"), "")
}

/// Whether a trimmed line begins a non-paragraph block. A `#` line only
/// counts when its hash count and trailing space make a valid heading.
fn starts_block(line: &str) -> bool {
    if line.starts_with(FENCE) || line.starts_with('>') {
        return true;
    }
    if line.starts_with("* ") || line.starts_with("- ") {
        return true;
    }
    if line.starts_with('#') {
        let count = line.chars().take_while(|&c| c == '#').count();
        return (1..=6).contains(&count) && line.as_bytes().get(count) == Some(&b' ');
    }
    is_ordered_item(line)
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}

fn preview(text: &str) -> String {
    text.chars().take(30).collect()
}

#[cfg(test)]
mod tests {
    use super::{classify, segment};
    use crate::ast::BlockType;
    use crate::error::ParseError;

    #[test]
    fn whitespace_only_input_yields_no_blocks() {
        assert_eq!(segment("").unwrap(), Vec::<String>::new());
        assert_eq!(segment("  \n\t\n  ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn heading_then_paragraph() {
        let blocks = segment("# Title\n\nHello world").unwrap();
        assert_eq!(blocks, vec!["# Title", "Hello world"]);
    }

    #[test]
    fn heading_without_space_falls_through_to_paragraph() {
        let blocks = segment("#nospace here\nmore text").unwrap();
        assert_eq!(blocks, vec!["#nospace here\nmore text"]);
        assert_eq!(classify(&blocks[0]), BlockType::Paragraph);
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        let blocks = segment("####### deep").unwrap();
        assert_eq!(blocks, vec!["####### deep"]);
        assert_eq!(classify(&blocks[0]), BlockType::Paragraph);
    }

    #[test]
    fn fenced_code_is_one_block() {
        let blocks = segment("```\ncode\n```\n\nafter").unwrap();
        assert_eq!(blocks, vec!["```\ncode\n```", "after"]);
    }

    #[test]
    fn unclosed_fence_is_an_error() {
        let err = segment("```\nnever closed").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedBlock(_)));
    }

    #[test]
    fn stray_fence_after_close_is_an_error() {
        let err = segment("```\na\n```\n```\nleftover").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedBlock(_)));
    }

    #[test]
    fn lone_trailing_fence_is_swallowed() {
        let blocks = segment("```\na\n```\n```").unwrap();
        assert_eq!(blocks, vec!["```\na\n```"]);
    }

    #[test]
    fn quote_lines_group_into_one_block() {
        let blocks = segment("> a\n> b\nplain").unwrap();
        assert_eq!(blocks, vec!["> a\n> b", "plain"]);
    }

    #[test]
    fn single_blank_line_is_kept_inside_a_list() {
        let blocks = segment("* a\n\n* b").unwrap();
        assert_eq!(blocks, vec!["* a\n\n* b"]);
    }

    #[test]
    fn double_blank_line_ends_a_list() {
        let blocks = segment("* a\n\n\n* b").unwrap();
        assert_eq!(blocks, vec!["* a", "* b"]);
    }

    #[test]
    fn ordered_segmentation_accepts_nonsequential_numbers() {
        // The segmenter only checks the digits-period-space shape; the
        // classifier demotes broken sequences.
        let blocks = segment("1. a\n3. b").unwrap();
        assert_eq!(blocks, vec!["1. a\n3. b"]);
        assert_eq!(classify(&blocks[0]), BlockType::Paragraph);
    }

    #[test]
    fn paragraph_flushes_before_a_marker_line() {
        let blocks = segment("text one\ntext two\n* item").unwrap();
        assert_eq!(blocks, vec!["text one\ntext two", "* item"]);
    }

    #[test]
    fn classify_recognizes_each_type() {
        assert_eq!(classify("```\nx\n```"), BlockType::Code);
        assert_eq!(classify("## Heading"), BlockType::Heading);
        assert_eq!(classify("> quoted"), BlockType::Quote);
        assert_eq!(classify("- a\n- b"), BlockType::UnorderedList);
        assert_eq!(classify("1. a\n2. b"), BlockType::OrderedList);
        assert_eq!(classify("just text"), BlockType::Paragraph);
    }

    #[test]
    fn mixed_list_markers_demote_to_paragraph() {
        assert_eq!(classify("* a\n- b"), BlockType::Paragraph);
    }

    #[test]
    fn ordered_numbering_gap_demotes_to_paragraph() {
        assert_eq!(classify("1. a\n3. b"), BlockType::Paragraph);
        assert_eq!(classify("1. a\n1. b"), BlockType::Paragraph);
    }

    #[test]
    fn quote_with_unquoted_line_demotes_to_paragraph() {
        assert_eq!(classify("> a\nb"), BlockType::Paragraph);
    }
}
