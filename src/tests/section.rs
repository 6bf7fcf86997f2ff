use super::{parse_sections, PREAMBLE_TITLE, WHOLE_DOCUMENT_TITLE};

#[test]
fn test_totality_reconstructs_document() {
    let doc = "# Agreement\n\nintro text\n\n## 1. Definitions\n\n- **Goods**: things\n- **Buyer**: us\n\n### 1.1 Scope\n\ndetails\n\n## 2. Term\n\ntwo years\n";
    let sections = parse_sections(doc);

    let rebuilt: String = sections.iter().map(|s| s.full_text(doc)).collect();
    assert_eq!(rebuilt, doc, "concatenated section spans must be the input");
}

#[test]
fn test_totality_without_trailing_newline() {
    let doc = "# A\n\nalpha\n\n## B\n\nbeta";
    let sections = parse_sections(doc);

    let rebuilt: String = sections.iter().map(|s| s.full_text(doc)).collect();
    assert_eq!(rebuilt, doc);
}

#[test]
fn test_contiguity() {
    let doc = "preamble\n\n# One\n\na\n\n### Three\n\nb\n\n## Two\n\nc\n";
    let sections = parse_sections(doc);

    assert_eq!(sections[0].byte_start, 0);
    assert_eq!(sections[sections.len() - 1].byte_end, doc.len());
    for pair in sections.windows(2) {
        assert_eq!(
            pair[0].byte_end, pair[1].byte_start,
            "adjacent sections must share a boundary"
        );
    }
}

#[test]
fn test_no_header_fallback() {
    let doc = "Just flat text.\nAnother line.\n";
    let sections = parse_sections(doc);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, WHOLE_DOCUMENT_TITLE);
    assert_eq!(sections[0].level, 0);
    assert_eq!(sections[0].body, doc.trim());
    assert_eq!(sections[0].byte_start, 0);
    assert_eq!(sections[0].byte_end, doc.len());
}

#[test]
fn test_empty_input_yields_no_sections() {
    assert!(parse_sections("").is_empty());
}

#[test]
fn test_whitespace_only_input_is_one_synthetic_section() {
    let sections = parse_sections("\n\n");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, WHOLE_DOCUMENT_TITLE);
    assert_eq!(sections[0].body, "");
}

#[test]
fn test_preamble_before_first_header() {
    let doc = "intro line\n\n# One\n\nbody\n";
    let sections = parse_sections(doc);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, PREAMBLE_TITLE);
    assert_eq!(sections[0].level, 0);
    assert_eq!(sections[0].body, "intro line");
    assert_eq!(sections[0].byte_start, 0);
    assert_eq!(sections[0].byte_end, sections[1].byte_start);
    assert_eq!(sections[1].title, "One");
}

#[test]
fn test_bold_wrapped_line_is_not_a_header() {
    let doc = "# Top\n\n**Definitions**\nsome body\n";
    let sections = parse_sections(doc);

    assert_eq!(sections.len(), 1, "bold emphasis must not split sections");
    assert!(sections[0].body.contains("**Definitions**"));
}

#[test]
fn test_header_levels_do_not_nest() {
    let doc = "# A\n\n### B\n\n## C\n";
    let sections = parse_sections(doc);

    let levels: Vec<u8> = sections.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![1, 3, 2], "flat list, no hierarchy repair");
}

#[test]
fn test_title_markers_and_whitespace_stripped() {
    let doc = "##   Spaced Title   \ncontent\n";
    let sections = parse_sections(doc);

    assert_eq!(sections[0].title, "Spaced Title");
    assert_eq!(sections[0].level, 2);
}

#[test]
fn test_header_requires_space_and_sane_depth() {
    for doc in ["#NotAHeader\ntext\n", "####### SevenDeep\ntext\n", "# \ntext\n"] {
        let sections = parse_sections(doc);
        assert_eq!(sections.len(), 1, "no header in {doc:?}");
        assert_eq!(sections[0].title, WHOLE_DOCUMENT_TITLE);
    }
}

#[test]
fn test_trailing_blank_lines_trimmed_from_body() {
    let doc = "# A\nbody line\n\n\n# B\nnext\n";
    let sections = parse_sections(doc);

    assert_eq!(sections[0].body, "body line");
    assert_eq!(sections[1].body, "next");
}

#[test]
fn test_multibyte_content_keeps_valid_offsets() {
    let doc = "# Préambule\n\nclause — première\n\n## Durée\n\ndeux ans\n";
    let sections = parse_sections(doc);

    let rebuilt: String = sections.iter().map(|s| s.full_text(doc)).collect();
    assert_eq!(rebuilt, doc);
    assert_eq!(sections[0].title, "Préambule");
    assert_eq!(sections[1].title, "Durée");
}
