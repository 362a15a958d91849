//! Syntactic to semantic decoding
//!
//! Maps collected CSI/ESC/OSC sequences onto the semantic action
//! taxonomy. Unknown sequences decode to nothing; unknown SGR
//! parameters decode to `Attribute::Unknown` so the dispatcher can drop
//! them without stopping the stream.

use log::debug;

use crate::action::{
    Action, Attribute, ColorOperationKind, ColorRequest, ColorTarget, CursorStyleRequest,
    DeviceAttributeReq, DeviceStatusReq, EraseDisplayMode, EraseLineMode, ModifyKeyFormat,
    MouseShape, ProtectedModeKind, StatusDisplay, TabClearScope,
};
use crate::core::{
    Charset, CharsetBank, CharsetSlot, KittyKeyFlags, KittySetOp, Mode, Rgb, StyleColor,
    UnderlineStyle,
};
use crate::parser::params::Params;
use crate::parser::state::CsiSequence;

/// Decode a C0 control byte
pub(crate) fn c0_action(byte: u8, sink: &mut dyn FnMut(Action)) {
    match byte {
        0x05 => sink(Action::Enquiry),
        0x07 => sink(Action::Bell),
        0x08 => sink(Action::Backspace),
        0x09 => sink(Action::HorizontalTab(1)),
        // LF, VT, FF all behave as line feed
        0x0A | 0x0B | 0x0C => sink(Action::Linefeed),
        0x0D => sink(Action::CarriageReturn),
        0x0E => sink(Action::InvokeCharset {
            bank: CharsetBank::GL,
            slot: CharsetSlot::G1,
            locking: true,
        }),
        0x0F => sink(Action::InvokeCharset {
            bank: CharsetBank::GL,
            slot: CharsetSlot::G0,
            locking: true,
        }),
        _ => {}
    }
}

/// Decode an ESC sequence
pub(crate) fn esc_actions(intermediates: &[u8], final_byte: u8, sink: &mut dyn FnMut(Action)) {
    let invoke = |bank, slot, locking| Action::InvokeCharset {
        bank,
        slot,
        locking,
    };
    match (intermediates, final_byte) {
        ([], b'7') => sink(Action::SaveCursor),
        ([], b'8') => sink(Action::RestoreCursor),
        ([], b'D') => sink(Action::Index),
        ([], b'E') => sink(Action::NextLine),
        ([], b'H') => sink(Action::TabSet),
        ([], b'M') => sink(Action::ReverseIndex),
        ([], b'c') => sink(Action::FullReset),
        ([], b'V') => sink(Action::SetProtectedMode(ProtectedModeKind::Iso)),
        ([], b'W') => sink(Action::SetProtectedMode(ProtectedModeKind::Off)),
        ([], b'N') => sink(invoke(CharsetBank::GL, CharsetSlot::G2, false)),
        ([], b'O') => sink(invoke(CharsetBank::GL, CharsetSlot::G3, false)),
        ([], b'n') => sink(invoke(CharsetBank::GL, CharsetSlot::G2, true)),
        ([], b'o') => sink(invoke(CharsetBank::GL, CharsetSlot::G3, true)),
        ([], b'|') => sink(invoke(CharsetBank::GR, CharsetSlot::G3, true)),
        ([], b'}') => sink(invoke(CharsetBank::GR, CharsetSlot::G2, true)),
        ([], b'~') => sink(invoke(CharsetBank::GR, CharsetSlot::G1, true)),
        ([b'('], c) => sink(configure(CharsetSlot::G0, c)),
        ([b')'], c) => sink(configure(CharsetSlot::G1, c)),
        ([b'*'], c) => sink(configure(CharsetSlot::G2, c)),
        ([b'+'], c) => sink(configure(CharsetSlot::G3, c)),
        ([b'#'], b'8') => sink(Action::Decaln),
        // Keypad modes and everything else unrecognized are dropped.
        _ => debug!(
            "unhandled ESC: intermediates={:?} final={}",
            intermediates, final_byte as char
        ),
    }
}

fn configure(slot: CharsetSlot, designation: u8) -> Action {
    Action::ConfigureCharset {
        slot,
        set: Charset::from_designation(designation as char),
    }
}

/// Decode a CSI sequence
pub(crate) fn csi_actions(seq: &CsiSequence, sink: &mut dyn FnMut(Action)) {
    // Sequences carrying intermediates form their own namespace.
    if !seq.intermediates.is_empty() {
        return csi_intermediate_actions(seq, sink);
    }

    let params = &seq.params;
    let count = params.get_or(0, 1);
    match (seq.marker, seq.final_byte) {
        (0, b'A') => sink(Action::CursorUp(count)),
        (0, b'B') => sink(Action::CursorDown(count)),
        (0, b'C') => sink(Action::CursorRight(count)),
        (0, b'D') => sink(Action::CursorLeft(count)),
        (0, b'E') => {
            sink(Action::CursorDown(count));
            sink(Action::CarriageReturn);
        }
        (0, b'F') => {
            sink(Action::CursorUp(count));
            sink(Action::CarriageReturn);
        }
        (0, b'G') | (0, b'`') => sink(Action::CursorCol(count)),
        (0, b'H') | (0, b'f') => sink(Action::CursorPos {
            row: params.get_or(0, 1),
            col: params.get_or(1, 1),
        }),
        (0, b'I') => sink(Action::HorizontalTab(count)),
        (0, b'J') | (b'?', b'J') => {
            let mode = match params.raw(0) {
                0 => EraseDisplayMode::Below,
                1 => EraseDisplayMode::Above,
                2 => EraseDisplayMode::Complete,
                3 => EraseDisplayMode::Scrollback,
                22 => EraseDisplayMode::ScrollComplete,
                other => {
                    debug!("unknown ED mode {other}");
                    return;
                }
            };
            sink(Action::EraseDisplay {
                mode,
                selective: seq.marker == b'?',
            });
        }
        (0, b'K') | (b'?', b'K') => {
            let mode = match params.raw(0) {
                0 => EraseLineMode::Right,
                1 => EraseLineMode::Left,
                2 => EraseLineMode::Complete,
                4 => EraseLineMode::RightUnlessPendingWrap,
                other => {
                    debug!("unknown EL mode {other}");
                    return;
                }
            };
            sink(Action::EraseLine {
                mode,
                selective: seq.marker == b'?',
            });
        }
        (0, b'L') => sink(Action::InsertLines(count)),
        (0, b'M') => sink(Action::DeleteLines(count)),
        (0, b'P') => sink(Action::DeleteChars(count)),
        (0, b'S') => sink(Action::ScrollUp(count)),
        (0, b'T') => sink(Action::ScrollDown(count)),
        (0, b'X') => sink(Action::EraseChars(count)),
        (0, b'Z') => sink(Action::HorizontalTabBack(count)),
        (0, b'@') => sink(Action::InsertBlanks(count)),
        (0, b'a') => sink(Action::CursorColRelative(count)),
        (0, b'b') => sink(Action::PrintRepeat(count)),
        (0, b'c') => sink(Action::DeviceAttributes(DeviceAttributeReq::Primary)),
        (b'>', b'c') => sink(Action::DeviceAttributes(DeviceAttributeReq::Secondary)),
        (b'=', b'c') => sink(Action::DeviceAttributes(DeviceAttributeReq::Tertiary)),
        (0, b'd') => sink(Action::CursorRow(count)),
        (0, b'e') => sink(Action::CursorRowRelative(count)),
        (0, b'g') => match params.raw(0) {
            0 => sink(Action::TabClear(TabClearScope::Current)),
            3 => sink(Action::TabClear(TabClearScope::All)),
            other => debug!("unknown TBC scope {other}"),
        },
        (0, b'h') | (0, b'l') => decode_modes(params, true, seq.final_byte == b'h', sink),
        (b'?', b'h') | (b'?', b'l') => {
            decode_modes(params, false, seq.final_byte == b'h', sink)
        }
        (0, b'm') => sgr_actions(params, sink),
        (b'>', b'm') => {
            // XTMODKEYS. Only the modifyOtherKeys resource is modeled.
            if params.raw(0) == 4 {
                let format = match params.raw(1) {
                    2 => ModifyKeyFormat::OtherKeysNumeric,
                    _ => ModifyKeyFormat::OtherKeys,
                };
                sink(Action::ModifyKeyFormat(format));
            }
        }
        (0, b'n') => match params.raw(0) {
            5 => sink(Action::DeviceStatus(DeviceStatusReq::OperatingStatus)),
            6 => sink(Action::DeviceStatus(DeviceStatusReq::CursorPosition)),
            other => debug!("unknown DSR request {other}"),
        },
        (0, b'r') => sink(Action::TopAndBottomMargin {
            top: params.get_or(0, 1),
            bottom: params.raw(1),
        }),
        (b'?', b'r') => decode_save_restore(params, false, sink),
        (0, b's') => {
            if params.is_empty() {
                sink(Action::LeftAndRightMarginAmbiguous);
            } else {
                sink(Action::LeftAndRightMargin {
                    left: params.raw(0),
                    right: params.raw(1),
                });
            }
        }
        (b'>', b's') => sink(Action::MouseShiftCapture(params.raw(0) == 1)),
        (b'?', b's') => decode_save_restore(params, true, sink),
        (0, b't') => match params.raw(0) {
            14 | 16 | 18 | 19 => sink(Action::SizeReportRequest),
            22 => sink(Action::TitlePush),
            23 => sink(Action::TitlePop),
            other => debug!("unknown window op {other}"),
        },
        (b'?', b'W') => {
            // DECST8C: reset tab stops to every eight columns.
            if params.raw(0) == 5 {
                sink(Action::TabReset);
            }
        }
        (0, b'u') => sink(Action::RestoreCursor),
        (b'>', b'u') => sink(Action::KittyKeyboardPush(kitty_flags(params.raw(0)))),
        (b'<', b'u') => sink(Action::KittyKeyboardPop(params.get_or(0, 1))),
        (b'=', b'u') => {
            let op = match params.raw(1) {
                2 => KittySetOp::Or,
                3 => KittySetOp::Not,
                _ => KittySetOp::Set,
            };
            sink(Action::KittyKeyboardSet {
                op,
                flags: kitty_flags(params.raw(0)),
            });
        }
        (b'?', b'u') => sink(Action::KittyKeyboardQuery),
        (b'>', b'q') => sink(Action::XtVersion),
        _ => debug!(
            "unhandled CSI: marker={:?} final={}",
            seq.marker as char, seq.final_byte as char
        ),
    }
}

fn csi_intermediate_actions(seq: &CsiSequence, sink: &mut dyn FnMut(Action)) {
    let params = &seq.params;
    match (seq.intermediates.as_slice(), seq.final_byte) {
        ([b' '], b'q') => {
            let style = match params.raw(0) {
                0 => CursorStyleRequest::Default,
                1 => CursorStyleRequest::BlinkingBlock,
                2 => CursorStyleRequest::SteadyBlock,
                3 => CursorStyleRequest::BlinkingUnderline,
                4 => CursorStyleRequest::SteadyUnderline,
                5 => CursorStyleRequest::BlinkingBar,
                6 => CursorStyleRequest::SteadyBar,
                other => {
                    debug!("unknown DECSCUSR style {other}");
                    return;
                }
            };
            sink(Action::CursorStyle(style));
        }
        ([b'"'], b'q') => {
            let kind = match params.raw(0) {
                1 => ProtectedModeKind::Dec,
                _ => ProtectedModeKind::Off,
            };
            sink(Action::SetProtectedMode(kind));
        }
        ([b'!'], b'p') => sink(Action::FullReset),
        ([b'$'], b'p') => {
            let ansi = seq.marker != b'?';
            if let Some(mode) = Mode::from_tag(params.raw(0), ansi) {
                sink(Action::RequestMode(mode));
            }
        }
        ([b'$'], b'}') => {
            let display = match params.raw(0) {
                1 => StatusDisplay::StatusLine,
                _ => StatusDisplay::Main,
            };
            sink(Action::ActiveStatusDisplay(display));
        }
        _ => debug!(
            "unhandled CSI with intermediates {:?} final {}",
            seq.intermediates, seq.final_byte as char
        ),
    }
}

fn decode_modes(params: &Params, ansi: bool, set: bool, sink: &mut dyn FnMut(Action)) {
    for param in params.iter() {
        match Mode::from_tag(param, ansi) {
            Some(mode) => sink(if set {
                Action::SetMode(mode)
            } else {
                Action::ResetMode(mode)
            }),
            None => debug!("unknown mode {param} (ansi={ansi})"),
        }
    }
}

fn decode_save_restore(params: &Params, save: bool, sink: &mut dyn FnMut(Action)) {
    for param in params.iter() {
        match Mode::from_tag(param, false) {
            Some(mode) => sink(if save {
                Action::SaveMode(mode)
            } else {
                Action::RestoreMode(mode)
            }),
            None => debug!("unknown mode {param} in save/restore"),
        }
    }
}

fn kitty_flags(raw: u16) -> KittyKeyFlags {
    KittyKeyFlags::from_bits_truncate(raw as u8)
}

/// Decode SGR parameters into attribute actions
fn sgr_actions(params: &Params, sink: &mut dyn FnMut(Action)) {
    if params.is_empty() {
        sink(Action::SetAttribute(Attribute::Unset));
        return;
    }

    let mut attr = |a| sink(Action::SetAttribute(a));
    let mut i = 0;
    while i < params.len() {
        let param = params.raw(i);
        let subs = params.subparams(i);
        let mut consumed = 1;
        match param {
            0 => attr(Attribute::Unset),
            1 => attr(Attribute::Bold),
            2 => attr(Attribute::Faint),
            3 => attr(Attribute::Italic),
            4 => match subs.first() {
                None => attr(Attribute::Underline(UnderlineStyle::Single)),
                Some(0) => attr(Attribute::ResetUnderline),
                Some(1) => attr(Attribute::Underline(UnderlineStyle::Single)),
                Some(2) => attr(Attribute::Underline(UnderlineStyle::Double)),
                Some(3) => attr(Attribute::Underline(UnderlineStyle::Curly)),
                Some(4) => attr(Attribute::Underline(UnderlineStyle::Dotted)),
                Some(5) => attr(Attribute::Underline(UnderlineStyle::Dashed)),
                Some(_) => attr(Attribute::Unknown(4)),
            },
            5 | 6 => attr(Attribute::Blink),
            7 => attr(Attribute::Inverse),
            8 => attr(Attribute::Invisible),
            9 => attr(Attribute::Strikethrough),
            21 => attr(Attribute::Underline(UnderlineStyle::Double)),
            22 => attr(Attribute::NormalIntensity),
            23 => attr(Attribute::ResetItalic),
            24 => attr(Attribute::ResetUnderline),
            25 => attr(Attribute::ResetBlink),
            27 => attr(Attribute::ResetInverse),
            28 => attr(Attribute::ResetInvisible),
            29 => attr(Attribute::ResetStrikethrough),
            30..=37 => attr(Attribute::Foreground(StyleColor::Palette(param as u8 - 30))),
            38 => match extended_color(params, i) {
                Some((color, used)) => {
                    consumed = used;
                    attr(Attribute::Foreground(color));
                }
                None => attr(Attribute::Unknown(38)),
            },
            39 => attr(Attribute::ResetForeground),
            40..=47 => attr(Attribute::Background(StyleColor::Palette(param as u8 - 40))),
            48 => match extended_color(params, i) {
                Some((color, used)) => {
                    consumed = used;
                    attr(Attribute::Background(color));
                }
                None => attr(Attribute::Unknown(48)),
            },
            49 => attr(Attribute::ResetBackground),
            53 => attr(Attribute::Overline),
            55 => attr(Attribute::ResetOverline),
            58 => match extended_color(params, i) {
                Some((color, used)) => {
                    consumed = used;
                    attr(Attribute::UnderlineColor(color));
                }
                None => attr(Attribute::Unknown(58)),
            },
            59 => attr(Attribute::ResetUnderlineColor),
            90..=97 => attr(Attribute::Foreground(StyleColor::Palette(
                param as u8 - 90 + 8,
            ))),
            100..=107 => attr(Attribute::Background(StyleColor::Palette(
                param as u8 - 100 + 8,
            ))),
            other => attr(Attribute::Unknown(other)),
        }
        i += consumed;
    }
}

/// Parse an extended color at parameter `i` (value 38/48/58), in either
/// the semicolon form (`38;5;N`, `38;2;R;G;B`) or the colon subparameter
/// form (`38:5:N`, `38:2:R:G:B`, `38:2::R:G:B`). Returns the color and
/// the number of parameters consumed.
fn extended_color(params: &Params, i: usize) -> Option<(StyleColor, usize)> {
    let subs = params.subparams(i);
    if !subs.is_empty() {
        let color = match subs.first()? {
            5 => StyleColor::Palette(*subs.get(1)? as u8),
            2 => {
                // An optional colorspace id may sit between the 2 and
                // the channels; take the last three values.
                let channels = subs.get(subs.len().checked_sub(3)?..)?;
                StyleColor::Rgb(Rgb::new(
                    channels[0] as u8,
                    channels[1] as u8,
                    channels[2] as u8,
                ))
            }
            _ => return None,
        };
        return Some((color, 1));
    }

    match params.raw(i + 1) {
        5 if params.len() > i + 2 => {
            Some((StyleColor::Palette(params.raw(i + 2) as u8), 3))
        }
        2 if params.len() > i + 4 => Some((
            StyleColor::Rgb(Rgb::new(
                params.raw(i + 2) as u8,
                params.raw(i + 3) as u8,
                params.raw(i + 4) as u8,
            )),
            5,
        )),
        _ => None,
    }
}

/// Decode a complete OSC payload
pub(crate) fn osc_actions(data: &str, sink: &mut dyn FnMut(Action)) {
    let (command, payload) = match data.find(';') {
        Some(position) => (&data[..position], &data[position + 1..]),
        None => (data, ""),
    };
    let Ok(command) = command.parse::<u16>() else {
        debug!("non-numeric OSC command ignored");
        return;
    };

    match command {
        0 | 1 | 2 => sink(Action::WindowTitle),
        4 => {
            let requests = parse_palette_requests(payload);
            if !requests.is_empty() {
                sink(Action::ColorOperation {
                    kind: ColorOperationKind::Palette,
                    requests,
                });
            }
        }
        7 => sink(Action::ReportPwd(payload.to_string())),
        8 => {
            let (options, uri) = match payload.find(';') {
                Some(position) => (&payload[..position], &payload[position + 1..]),
                None => ("", payload),
            };
            if uri.is_empty() {
                sink(Action::EndHyperlink);
            } else {
                let id = options
                    .split(':')
                    .find_map(|option| option.strip_prefix("id="))
                    .map(str::to_string);
                sink(Action::StartHyperlink {
                    uri: uri.to_string(),
                    id,
                });
            }
        }
        9 => {
            if payload.starts_with("4;") {
                sink(Action::ProgressReport);
            } else {
                sink(Action::ShowDesktopNotification {
                    title: String::new(),
                    body: payload.to_string(),
                });
            }
        }
        10 | 11 | 12 => {
            let target = match command {
                10 => ColorTarget::Foreground,
                11 => ColorTarget::Background,
                _ => ColorTarget::Cursor,
            };
            let request = if payload == "?" {
                ColorRequest::Query(target)
            } else if let Some(color) = Rgb::parse(payload) {
                ColorRequest::Set { target, color }
            } else {
                debug!("unparseable dynamic color spec");
                return;
            };
            sink(Action::ColorOperation {
                kind: ColorOperationKind::Dynamic,
                requests: vec![request],
            });
        }
        21 => sink(Action::KittyColorReport),
        22 => {
            if let Some(shape) = MouseShape::from_name(payload) {
                sink(Action::MouseShape(shape));
            }
        }
        52 => {
            let (clipboard, contents) = match payload.find(';') {
                Some(position) => (&payload[..position], &payload[position + 1..]),
                None => ("", payload),
            };
            sink(Action::ClipboardContents {
                clipboard: clipboard.chars().next().unwrap_or('c'),
                data: contents.to_string(),
            });
        }
        104 => {
            let requests = if payload.is_empty() {
                vec![ColorRequest::ResetPalette]
            } else {
                payload
                    .split(';')
                    .filter_map(|index| index.parse::<u8>().ok())
                    .map(|index| ColorRequest::Reset(ColorTarget::Palette(index)))
                    .collect()
            };
            if !requests.is_empty() {
                sink(Action::ColorOperation {
                    kind: ColorOperationKind::Reset,
                    requests,
                });
            }
        }
        110 | 111 | 112 => {
            let target = match command {
                110 => ColorTarget::Foreground,
                111 => ColorTarget::Background,
                _ => ColorTarget::Cursor,
            };
            sink(Action::ColorOperation {
                kind: ColorOperationKind::Reset,
                requests: vec![ColorRequest::Reset(target)],
            });
        }
        133 => decode_semantic_prompt(payload, sink),
        777 => {
            let mut parts = payload.splitn(3, ';');
            if parts.next() == Some("notify") {
                sink(Action::ShowDesktopNotification {
                    title: parts.next().unwrap_or("").to_string(),
                    body: parts.next().unwrap_or("").to_string(),
                });
            }
        }
        other => debug!("unhandled OSC {other}"),
    }
}

/// OSC 4 payload: index;spec pairs. A `?` spec is a query.
fn parse_palette_requests(payload: &str) -> Vec<ColorRequest> {
    let mut requests = Vec::new();
    let mut parts = payload.split(';');
    while let (Some(index), Some(spec)) = (parts.next(), parts.next()) {
        let Ok(index) = index.parse::<u8>() else {
            continue;
        };
        let target = ColorTarget::Palette(index);
        if spec == "?" {
            requests.push(ColorRequest::Query(target));
        } else if let Some(color) = Rgb::parse(spec) {
            requests.push(ColorRequest::Set { target, color });
        }
    }
    requests
}

/// OSC 133 semantic prompt markers (FinalTerm protocol)
fn decode_semantic_prompt(payload: &str, sink: &mut dyn FnMut(Action)) {
    let mut parts = payload.split(';');
    let Some(subcommand) = parts.next() else {
        return;
    };
    let options: Vec<&str> = parts.collect();
    match subcommand {
        "A" => {
            if options.iter().any(|option| *option == "k=c" || *option == "k=s") {
                sink(Action::PromptContinuation);
            } else {
                let redraw = !options.iter().any(|option| *option == "redraw=0");
                sink(Action::PromptStart { redraw });
            }
        }
        "B" => sink(Action::PromptEnd),
        "C" => sink(Action::EndOfInput),
        "D" => sink(Action::EndOfCommand),
        other => debug!("unknown semantic prompt marker {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_osc(data: &str) -> Vec<Action> {
        let mut out = Vec::new();
        osc_actions(data, &mut |action| out.push(action));
        out
    }

    fn collect_sgr(bytes: &[u8]) -> Vec<Action> {
        let params = Params::parse(bytes);
        let mut out = Vec::new();
        sgr_actions(&params, &mut |action| out.push(action));
        out
    }

    #[test]
    fn test_sgr_empty_is_reset() {
        assert_eq!(
            collect_sgr(b""),
            vec![Action::SetAttribute(Attribute::Unset)]
        );
    }

    #[test]
    fn test_sgr_truecolor_semicolon_form() {
        assert_eq!(
            collect_sgr(b"38;2;10;20;30"),
            vec![Action::SetAttribute(Attribute::Foreground(StyleColor::Rgb(
                Rgb::new(10, 20, 30)
            )))]
        );
    }

    #[test]
    fn test_sgr_truecolor_colon_form_with_colorspace() {
        assert_eq!(
            collect_sgr(b"58:2::1:2:3"),
            vec![Action::SetAttribute(Attribute::UnderlineColor(
                StyleColor::Rgb(Rgb::new(1, 2, 3))
            ))]
        );
    }

    #[test]
    fn test_sgr_curly_underline() {
        assert_eq!(
            collect_sgr(b"4:3"),
            vec![Action::SetAttribute(Attribute::Underline(
                UnderlineStyle::Curly
            ))]
        );
    }

    #[test]
    fn test_sgr_malformed_extended_color() {
        // An unknown color kind leaves 38 unconsumed-as-color; the
        // following parameters decode on their own.
        assert_eq!(
            collect_sgr(b"38;9;1"),
            vec![
                Action::SetAttribute(Attribute::Unknown(38)),
                Action::SetAttribute(Attribute::Strikethrough),
                Action::SetAttribute(Attribute::Bold),
            ]
        );
    }

    #[test]
    fn test_osc_4_set_and_query() {
        let actions = collect_osc("4;0;rgb:ff/00/00;1;?");
        assert_eq!(
            actions,
            vec![Action::ColorOperation {
                kind: ColorOperationKind::Palette,
                requests: vec![
                    ColorRequest::Set {
                        target: ColorTarget::Palette(0),
                        color: Rgb::new(255, 0, 0),
                    },
                    ColorRequest::Query(ColorTarget::Palette(1)),
                ],
            }]
        );
    }

    #[test]
    fn test_osc_104_forms() {
        assert_eq!(
            collect_osc("104"),
            vec![Action::ColorOperation {
                kind: ColorOperationKind::Reset,
                requests: vec![ColorRequest::ResetPalette],
            }]
        );
        assert_eq!(
            collect_osc("104;3;5"),
            vec![Action::ColorOperation {
                kind: ColorOperationKind::Reset,
                requests: vec![
                    ColorRequest::Reset(ColorTarget::Palette(3)),
                    ColorRequest::Reset(ColorTarget::Palette(5)),
                ],
            }]
        );
    }

    #[test]
    fn test_osc_hyperlink_with_id() {
        let actions = collect_osc("8;id=abc;https://example.com");
        assert_eq!(
            actions,
            vec![Action::StartHyperlink {
                uri: "https://example.com".into(),
                id: Some("abc".into()),
            }]
        );
    }

    #[test]
    fn test_osc_semantic_prompt() {
        assert_eq!(
            collect_osc("133;A"),
            vec![Action::PromptStart { redraw: true }]
        );
        assert_eq!(
            collect_osc("133;A;redraw=0"),
            vec![Action::PromptStart { redraw: false }]
        );
        assert_eq!(collect_osc("133;A;k=c"), vec![Action::PromptContinuation]);
        assert_eq!(collect_osc("133;B"), vec![Action::PromptEnd]);
        assert_eq!(collect_osc("133;C"), vec![Action::EndOfInput]);
        assert_eq!(collect_osc("133;D;0"), vec![Action::EndOfCommand]);
    }

    #[test]
    fn test_osc_mouse_shape() {
        assert_eq!(
            collect_osc("22;text"),
            vec![Action::MouseShape(MouseShape::Text)]
        );
        assert!(collect_osc("22;bogus").is_empty());
    }

    #[test]
    fn test_osc_notification_forms() {
        assert_eq!(
            collect_osc("9;hello"),
            vec![Action::ShowDesktopNotification {
                title: String::new(),
                body: "hello".into(),
            }]
        );
        assert_eq!(collect_osc("9;4;1;50"), vec![Action::ProgressReport]);
        assert_eq!(
            collect_osc("777;notify;Title;Body"),
            vec![Action::ShowDesktopNotification {
                title: "Title".into(),
                body: "Body".into(),
            }]
        );
    }
}
