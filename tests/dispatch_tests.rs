//! End-to-end dispatch tests
//!
//! Each test drives a fresh terminal with literal input bytes through
//! the parser and performer, then asserts on the resulting state.

use kumo_vt::core::{KittyKeyFlags, Mode, Rgb, StyleColor};
use kumo_vt::{Parser, Performer, Terminal};

fn process(term: &mut Terminal, bytes: &[u8]) {
    let mut parser = Parser::new();
    let mut performer = Performer::new(term);
    for action in parser.feed(bytes) {
        performer.perform(action).unwrap();
    }
}

fn terminal(cols: usize, rows: usize, bytes: &[u8]) -> Terminal {
    let mut term = Terminal::new(cols, rows);
    process(&mut term, bytes);
    term
}

#[test]
fn plain_text_advances_cursor() {
    let term = terminal(10, 10, b"Hello");
    assert_eq!(term.to_text(), "Hello");
    assert_eq!(term.cursor().col, 5);
    assert_eq!(term.cursor().row, 0);
}

#[test]
fn cursor_home_leaves_content() {
    let term = terminal(10, 10, b"Hello\x1b[1;1H");
    assert_eq!(term.cursor().col, 0);
    assert_eq!(term.cursor().row, 0);
    assert_eq!(term.to_text(), "Hello");
}

#[test]
fn erase_to_end_of_line() {
    let term = terminal(20, 10, b"Hello World\x1b[1;6H\x1b[K");
    assert_eq!(term.to_text(), "Hello");
}

#[test]
fn tab_stops_every_eight() {
    let term = terminal(80, 10, b"A\tB");
    assert_eq!(term.to_text(), "A       B");
    assert_eq!(term.cursor().col, 9);
}

#[test]
fn wraparound_mode_reset() {
    let term = terminal(80, 24, b"\x1b[?7l");
    assert!(!term.modes.get(Mode::Wraparound));
}

#[test]
fn scroll_region_set() {
    let term = terminal(80, 24, b"\x1b[5;20r");
    let region = term.scrolling_region();
    assert_eq!(region.top, 4);
    assert_eq!(region.bottom, 19);
    assert_eq!(region.left, 0);
    assert_eq!(region.right, 79);
}

#[test]
fn decaln_fills_screen() {
    let term = terminal(10, 3, b"\x1b#8");
    for row in 0..3 {
        assert_eq!(term.line(row).text(), "EEEEEEEEEE");
    }
    assert_eq!(term.cursor().col, 0);
    assert_eq!(term.cursor().row, 0);
}

#[test]
fn full_reset_restores_everything() {
    let term = terminal(80, 24, b"Hello\x1b[10;20H\x1b[5;20r\x1b[?7l\x1bc");
    assert_eq!(term.cursor().col, 0);
    assert_eq!(term.cursor().row, 0);
    let region = term.scrolling_region();
    assert_eq!((region.top, region.bottom), (0, 23));
    assert_eq!((region.left, region.right), (0, 79));
    assert!(term.modes.get(Mode::Wraparound));
    assert_eq!(term.to_text(), "");
}

#[test]
fn osc4_overrides_palette_entry() {
    let term = terminal(10, 10, b"\x1b]4;0;rgb:ff/00/00\x1b\\");
    assert_eq!(term.color_palette.colors[0], Rgb::new(255, 0, 0));
    assert!(term.color_palette.mask.contains(0));
}

#[test]
fn osc104_restores_palette_entry() {
    let term = terminal(10, 10, b"\x1b]4;0;rgb:ff/00/00\x1b\\\x1b]104;0\x1b\\");
    assert_eq!(term.color_palette.colors[0], term.default_palette[0]);
    assert!(!term.color_palette.mask.contains(0));
}

#[test]
fn osc104_bare_restores_all_overrides() {
    let mut term = Terminal::new(10, 10);
    process(
        &mut term,
        b"\x1b]4;1;rgb:00/ff/00\x1b\\\x1b]4;250;#123456\x1b\\\x1b]104\x1b\\",
    );
    assert!(term.color_palette.mask.is_empty());
    assert_eq!(term.color_palette.colors[1], term.default_palette[1]);
    assert_eq!(term.color_palette.colors[250], term.default_palette[250]);
}

#[test]
fn ambiguous_csi_s_saves_cursor_without_margin_mode() {
    let term = terminal(80, 24, b"\x1b[5;10H\x1b[s\x1b[1;1H\x1b[u");
    assert_eq!(term.cursor().row, 4);
    assert_eq!(term.cursor().col, 9);
}

#[test]
fn ambiguous_csi_s_resets_margins_with_margin_mode() {
    let term = terminal(80, 24, b"\x1b[?69h\x1b[10;40s\x1b[s");
    let region = term.scrolling_region();
    assert_eq!(region.left, 0);
    assert_eq!(region.right, 79);
}

#[test]
fn explicit_left_right_margins() {
    let term = terminal(80, 24, b"\x1b[?69h\x1b[10;40s");
    let region = term.scrolling_region();
    assert_eq!(region.left, 9);
    assert_eq!(region.right, 39);
}

#[test]
fn mode_save_restore_round_trip() {
    let mut term = Terminal::new(80, 24);
    process(&mut term, b"\x1b[?2004h\x1b[?2004s\x1b[?2004l");
    assert!(!term.modes.get(Mode::BracketedPaste));
    process(&mut term, b"\x1b[?2004r");
    assert!(term.modes.get(Mode::BracketedPaste));
}

#[test]
fn cursor_motion_stays_in_bounds() {
    let mut term = Terminal::new(80, 24);
    process(
        &mut term,
        b"\x1b[999A\x1b[999D\x1b[500B\x1b[500C\x1b[999;999H\x1b[200a\x1b[200e",
    );
    assert!(term.cursor().col < 80);
    assert!(term.cursor().row < 24);
}

#[test]
fn autowrap_pending_state() {
    let mut term = Terminal::new(5, 3, );
    process(&mut term, b"12345");
    assert_eq!(term.cursor().col, 4);
    assert!(term.cursor().pending_wrap);
    process(&mut term, b"6");
    assert_eq!(term.line(0).text(), "12345");
    assert_eq!(term.line(1).text(), "6");
}

#[test]
fn rep_repeats_last_character() {
    let term = terminal(20, 3, b"ab\x1b[3b");
    assert_eq!(term.to_text(), "abbbb");
}

#[test]
fn insert_and_delete_characters() {
    let mut term = Terminal::new(10, 3);
    process(&mut term, b"ABCDE\x1b[1;2H\x1b[2@");
    assert_eq!(term.to_text(), "A  BCDE");
    process(&mut term, b"\x1b[3P");
    assert_eq!(term.to_text(), "ACDE");
}

#[test]
fn erase_characters_without_shifting() {
    let term = terminal(10, 3, b"ABCDE\x1b[1;2H\x1b[2X");
    assert_eq!(term.to_text(), "A  DE");
}

#[test]
fn erase_line_skipped_in_pending_wrap_state() {
    let mut term = Terminal::new(5, 3);
    process(&mut term, b"ABCDE");
    assert!(term.cursor().pending_wrap);

    // EL mode 4 leaves a line alone while the cursor is wrap-pending.
    process(&mut term, b"\x1b[4K");
    assert_eq!(term.to_text(), "ABCDE");

    // Once the pending state clears it erases to the right as usual.
    process(&mut term, b"\x1b[1;2H\x1b[4K");
    assert_eq!(term.to_text(), "A");
}

#[test]
fn alternate_screen_1049() {
    let mut term = Terminal::new(20, 5);
    process(&mut term, b"primary\x1b[?1049h");
    assert!(term.screen().using_alternate());
    assert_eq!(term.to_text(), "");
    process(&mut term, b"alt\x1b[?1049l");
    assert!(!term.screen().using_alternate());
    assert_eq!(term.to_text(), "primary");
    assert_eq!(term.cursor().col, 7);
}

#[test]
fn deccolm_gated_and_applied() {
    let mut term = Terminal::new(80, 24);
    process(&mut term, b"\x1b[?3h");
    assert_eq!(term.cols(), 80);

    process(&mut term, b"\x1b[?40h\x1b[?3h");
    assert_eq!(term.cols(), 132);
    process(&mut term, b"\x1b[?3l");
    assert_eq!(term.cols(), 80);
}

#[test]
fn selective_erase_respects_protection() {
    let mut term = Terminal::new(20, 3);
    process(&mut term, b"\x1b[1\"qAB\x1b[0\"qCD\x1b[1;1H\x1b[?K");
    assert_eq!(term.to_text(), "AB");
}

#[test]
fn kitty_keyboard_stack_via_bytes() {
    let mut term = Terminal::new(20, 5);
    process(&mut term, b"\x1b[>1u");
    assert_eq!(
        term.kitty_keyboard.current(),
        KittyKeyFlags::DISAMBIGUATE
    );
    process(&mut term, b"\x1b[=2;2u");
    assert_eq!(
        term.kitty_keyboard.current(),
        KittyKeyFlags::DISAMBIGUATE | KittyKeyFlags::REPORT_EVENT_TYPES
    );
    process(&mut term, b"\x1b[<1u");
    assert_eq!(term.kitty_keyboard.current(), KittyKeyFlags::empty());
}

#[test]
fn sgr_truecolor_reaches_cursor_style() {
    let term = terminal(20, 5, b"\x1b[38;2;1;2;3m\x1b[48;5;12m");
    assert_eq!(
        term.cursor().style.fg_color,
        StyleColor::Rgb(Rgb::new(1, 2, 3))
    );
    assert_eq!(term.cursor().style.bg_color, StyleColor::Palette(12));
}

#[test]
fn style_dedup_across_cells() {
    let mut term = Terminal::new(20, 5);
    process(&mut term, b"\x1b[1mAAAA");
    let id = term.cursor().style_id;
    assert!(id > 0);
    // Four cells plus the cursor reference.
    assert_eq!(term.screen().styles().ref_count(id), 5);
    assert_eq!(term.screen().styles().len(), 1);
}

#[test]
fn response_requiring_sequences_are_noops() {
    let mut term = Terminal::new(20, 5);
    process(&mut term, b"before");
    let snapshot = term.clone();

    process(
        &mut term,
        b"\x1b[c\x1b[>c\x1b[5n\x1b[6n\x1b[>q\x1b[14t\x1b[18t\x1b[?u\
          \x1b]0;title\x07\x1b]7;file:///tmp\x07\x1b]52;c;Zm9v\x07\
          \x1b]9;4;1;50\x07\x1b[22t\x1b[23t\x07\x05",
    );
    assert_eq!(term, snapshot);
}

#[test]
fn dcs_and_apc_payloads_are_consumed() {
    let mut term = Terminal::new(20, 5);
    process(&mut term, b"x");
    let snapshot = term.clone();
    process(&mut term, b"\x1bPq#0;1;2\x1b\\\x1b_Ga=t,f=32\x1b\\");
    assert_eq!(term, snapshot);
    // The stream keeps parsing afterwards.
    process(&mut term, b"y");
    assert_eq!(term.to_text(), "xy");
}

#[test]
fn scroll_region_confines_linefeed() {
    let mut term = Terminal::new(10, 5);
    process(&mut term, b"A\r\nB\r\nC\r\nD\r\nE");
    process(&mut term, b"\x1b[2;4r\x1b[4;1H\n");
    assert_eq!(term.line(0).text(), "A");
    assert_eq!(term.line(1).text(), "C");
    assert_eq!(term.line(2).text(), "D");
    assert_eq!(term.line(3).text(), "");
    assert_eq!(term.line(4).text(), "E");
}

#[test]
fn origin_mode_homes_to_region() {
    let mut term = Terminal::new(80, 24);
    process(&mut term, b"\x1b[5;20r\x1b[?6h");
    assert_eq!(term.cursor().row, 4);
    process(&mut term, b"\x1b[1;1H");
    assert_eq!(term.cursor().row, 4);
    assert_eq!(term.cursor().col, 0);
}

#[test]
fn charset_dec_graphics() {
    let term = terminal(10, 3, b"\x1b(0lqk");
    assert_eq!(term.to_text(), "┌─┐");
}

#[test]
fn hyperlink_sets_and_clears_cursor_state() {
    let mut term = Terminal::new(30, 3);
    process(&mut term, b"\x1b]8;;https://example.com\x1b\\L");
    let link = term.line(0).cell(0).hyperlink;
    assert!(link > 0);
    assert_eq!(
        term.screen().hyperlink_uri(link),
        Some("https://example.com")
    );

    process(&mut term, b"\x1b]8;;\x1b\\X");
    assert_eq!(term.line(0).cell(1).hyperlink, 0);
}

#[test]
fn semantic_prompt_marks_rows() {
    use kumo_vt::core::SemanticTag;
    let mut term = Terminal::new(30, 3);
    process(&mut term, b"\x1b]133;A\x07$ ");
    assert_eq!(term.line(0).semantic, SemanticTag::Prompt);
    process(&mut term, b"\x1b]133;B\x07");
    assert_eq!(term.line(0).semantic, SemanticTag::Input);
}

#[test]
fn scrollback_erase() {
    let mut term = Terminal::new(10, 2);
    process(&mut term, b"1\r\n2\r\n3\r\n4");
    assert!(term.screen().scrollback().len() > 0);
    process(&mut term, b"\x1b[3J");
    assert_eq!(term.screen().scrollback().len(), 0);
}
