//! Terminal actions
//!
//! Semantic operations produced by the parser and consumed by the
//! dispatcher. Each variant carries its payload inline so a single
//! exhaustive match routes every action; adding a tag without handling
//! it is a compile error in the dispatcher.

use serde::{Deserialize, Serialize};

use crate::core::{
    Charset, CharsetBank, CharsetSlot, KittyKeyFlags, KittySetOp, Mode, Rgb, StyleColor,
    UnderlineStyle,
};

/// A terminal action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Printing
    /// Print a character at the cursor
    Print(char),
    /// REP: repeat the last printed character
    PrintRepeat(u16),

    // C0 controls
    Backspace,
    CarriageReturn,
    Linefeed,
    /// IND: move down one line, scrolling at the bottom margin
    Index,
    /// RI: move up one line, scrolling at the top margin
    ReverseIndex,
    /// NEL: index then carriage return
    NextLine,

    // Cursor motion
    CursorUp(u16),
    CursorDown(u16),
    CursorLeft(u16),
    CursorRight(u16),
    /// CUP/HVP with 1-based coordinates
    CursorPos { row: u16, col: u16 },
    /// CHA/HPA: absolute column, 1-based
    CursorCol(u16),
    /// VPA: absolute row, 1-based
    CursorRow(u16),
    /// HPR: relative column motion with saturating addition
    CursorColRelative(u16),
    /// VPR: relative row motion with saturating addition
    CursorRowRelative(u16),
    /// DECSCUSR
    CursorStyle(CursorStyleRequest),

    // Erase
    EraseDisplay { mode: EraseDisplayMode, selective: bool },
    EraseLine { mode: EraseLineMode, selective: bool },

    // Line and character editing
    DeleteChars(u16),
    EraseChars(u16),
    InsertLines(u16),
    InsertBlanks(u16),
    DeleteLines(u16),
    ScrollUp(u16),
    ScrollDown(u16),

    // Tabs
    HorizontalTab(u16),
    HorizontalTabBack(u16),
    TabSet,
    TabClear(TabClearScope),
    TabReset,

    // Modes
    SetMode(Mode),
    ResetMode(Mode),
    SaveMode(Mode),
    RestoreMode(Mode),
    /// DECRQM; response-generating, ignored
    RequestMode(Mode),

    // Margins
    /// DECSTBM, 1-based; `bottom == 0` selects the last row
    TopAndBottomMargin { top: u16, bottom: u16 },
    /// DECSLRM, 1-based; `(0, 0)` resets to full width
    LeftAndRightMargin { left: u16, right: u16 },
    /// Bare `CSI s`: DECSLRM-to-full-width when left/right margin mode is
    /// enabled, otherwise save-cursor. Resolved by the dispatcher.
    LeftAndRightMarginAmbiguous,

    // Cursor save/restore
    SaveCursor,
    RestoreCursor,

    // Charsets
    InvokeCharset {
        bank: CharsetBank,
        slot: CharsetSlot,
        locking: bool,
    },
    ConfigureCharset {
        slot: CharsetSlot,
        set: Charset,
    },

    // SGR
    SetAttribute(Attribute),

    // Protection
    SetProtectedMode(ProtectedModeKind),

    // Mouse
    MouseShiftCapture(bool),
    MouseShape(MouseShape),

    // Kitty keyboard protocol
    KittyKeyboardPush(KittyKeyFlags),
    KittyKeyboardPop(u16),
    KittyKeyboardSet { op: KittySetOp, flags: KittyKeyFlags },
    /// Response-generating, ignored
    KittyKeyboardQuery,

    // Key reporting format (XTMODKEYS)
    ModifyKeyFormat(ModifyKeyFormat),

    // Status line (DECSASD)
    ActiveStatusDisplay(StatusDisplay),

    // Screen
    /// DEC screen alignment test
    Decaln,
    /// RIS
    FullReset,

    // Hyperlinks (OSC 8)
    StartHyperlink { uri: String, id: Option<String> },
    EndHyperlink,

    // Semantic prompts (OSC 133)
    PromptStart { redraw: bool },
    PromptContinuation,
    PromptEnd,
    EndOfInput,
    EndOfCommand,

    // OSC color operations
    ColorOperation {
        kind: ColorOperationKind,
        requests: Vec<ColorRequest>,
    },

    // DCS/APC payload boundaries; accepted as no-ops
    DcsHook,
    DcsPut(u8),
    DcsUnhook,
    ApcStart,
    ApcPut(u8),
    ApcEnd,

    // Accepted no-ops and response-requiring actions, all ignored
    Bell,
    Enquiry,
    SizeReportRequest,
    XtVersion,
    DeviceAttributes(DeviceAttributeReq),
    DeviceStatus(DeviceStatusReq),
    KittyColorReport,
    WindowTitle,
    ReportPwd(String),
    ShowDesktopNotification { title: String, body: String },
    ProgressReport,
    ClipboardContents { clipboard: char, data: String },
    TitlePush,
    TitlePop,
}

/// DECSCUSR cursor style request: a shape/blink pair, or the terminal
/// default (a steady block)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyleRequest {
    Default,
    BlinkingBlock,
    SteadyBlock,
    BlinkingUnderline,
    SteadyUnderline,
    BlinkingBar,
    SteadyBar,
}

/// ED parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraseDisplayMode {
    Below,
    Above,
    Complete,
    Scrollback,
    ScrollComplete,
}

/// EL parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraseLineMode {
    Right,
    Left,
    Complete,
    /// Erase right, unless the cursor sits in the autowrap-pending state
    RightUnlessPendingWrap,
}

/// TBC parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabClearScope {
    Current,
    All,
}

/// Protection flavor selected by DECSCA / SPA / EPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtectedModeKind {
    Off,
    Iso,
    Dec,
}

/// XTMODKEYS `modifyOtherKeys` formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyKeyFormat {
    Legacy,
    CursorKeys,
    FunctionKeys,
    OtherKeys,
    OtherKeysNumeric,
}

/// DECSASD parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusDisplay {
    #[default]
    Main,
    StatusLine,
}

/// Pointer shape requested via OSC 22
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseShape {
    #[default]
    Default,
    Text,
    Pointer,
    Crosshair,
    Grab,
    Grabbing,
    Progress,
    Wait,
    Help,
    NotAllowed,
    EwResize,
    NsResize,
}

impl MouseShape {
    /// Parse a CSS cursor keyword as used by OSC 22
    pub fn from_name(name: &str) -> Option<MouseShape> {
        Some(match name {
            "default" => MouseShape::Default,
            "text" => MouseShape::Text,
            "pointer" => MouseShape::Pointer,
            "crosshair" => MouseShape::Crosshair,
            "grab" => MouseShape::Grab,
            "grabbing" => MouseShape::Grabbing,
            "progress" => MouseShape::Progress,
            "wait" => MouseShape::Wait,
            "help" => MouseShape::Help,
            "not-allowed" => MouseShape::NotAllowed,
            "ew-resize" => MouseShape::EwResize,
            "ns-resize" => MouseShape::NsResize,
            _ => return None,
        })
    }
}

/// A parsed SGR attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// SGR 0
    Unset,
    Bold,
    Faint,
    /// SGR 22: neither bold nor faint
    NormalIntensity,
    Italic,
    ResetItalic,
    Underline(UnderlineStyle),
    ResetUnderline,
    UnderlineColor(StyleColor),
    ResetUnderlineColor,
    Blink,
    ResetBlink,
    Inverse,
    ResetInverse,
    Invisible,
    ResetInvisible,
    Strikethrough,
    ResetStrikethrough,
    Overline,
    ResetOverline,
    Foreground(StyleColor),
    ResetForeground,
    Background(StyleColor),
    ResetBackground,
    /// Unrecognized SGR parameter; ignored for forward compatibility
    Unknown(u16),
}

/// Which OSC introduced a color operation. The dispatcher does not
/// branch on this; it is retained for caller symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorOperationKind {
    /// OSC 4
    Palette,
    /// OSC 10/11/12
    Dynamic,
    /// OSC 104/110/111/112
    Reset,
}

/// Target of a single OSC color request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTarget {
    Palette(u8),
    Foreground,
    Background,
    Cursor,
}

/// A single request inside an OSC color operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorRequest {
    Set { target: ColorTarget, color: Rgb },
    Reset(ColorTarget),
    /// OSC 104 without parameters: restore every overridden entry
    ResetPalette,
    /// Response-generating, ignored
    Query(ColorTarget),
    /// Response-generating, ignored
    ResetSpecial,
}

/// Primary/secondary device attribute requests; response-generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceAttributeReq {
    Primary,
    Secondary,
    Tertiary,
}

/// DSR requests; response-generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatusReq {
    OperatingStatus,
    CursorPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_shape_names() {
        assert_eq!(MouseShape::from_name("default"), Some(MouseShape::Default));
        assert_eq!(MouseShape::from_name("pointer"), Some(MouseShape::Pointer));
        assert_eq!(
            MouseShape::from_name("not-allowed"),
            Some(MouseShape::NotAllowed)
        );
        assert_eq!(MouseShape::from_name("spiral"), None);
    }
}
