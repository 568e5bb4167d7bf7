#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Editor interactions a track can individually allow or forbid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Cursor,
    FadeIn,
    FadeOut,
    Select,
    Shift,
    Record,
}

impl Interaction {
    pub const ALL: [Interaction; 6] = [
        Interaction::Cursor,
        Interaction::FadeIn,
        Interaction::FadeOut,
        Interaction::Select,
        Interaction::Shift,
        Interaction::Record,
    ];
}

/// Per-track interaction permissions. Everything is enabled by default.
///
/// Missing keys in a persisted record fall back to enabled, so a record
/// only needs to list what it turns off.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledStates {
    pub cursor: bool,
    #[cfg_attr(feature = "serde", serde(rename = "fadein"))]
    pub fade_in: bool,
    #[cfg_attr(feature = "serde", serde(rename = "fadeout"))]
    pub fade_out: bool,
    pub select: bool,
    pub shift: bool,
    pub record: bool,
}

impl EnabledStates {
    pub fn is_enabled(&self, interaction: Interaction) -> bool {
        match interaction {
            Interaction::Cursor => self.cursor,
            Interaction::FadeIn => self.fade_in,
            Interaction::FadeOut => self.fade_out,
            Interaction::Select => self.select,
            Interaction::Shift => self.shift,
            Interaction::Record => self.record,
        }
    }

    pub fn set_enabled(&mut self, interaction: Interaction, enabled: bool) {
        let flag = match interaction {
            Interaction::Cursor => &mut self.cursor,
            Interaction::FadeIn => &mut self.fade_in,
            Interaction::FadeOut => &mut self.fade_out,
            Interaction::Select => &mut self.select,
            Interaction::Shift => &mut self.shift,
            Interaction::Record => &mut self.record,
        };
        *flag = enabled;
    }

    /// Builder-style variant of [`set_enabled`](Self::set_enabled)
    pub fn with(mut self, interaction: Interaction, enabled: bool) -> Self {
        self.set_enabled(interaction, enabled);
        self
    }
}

impl Default for EnabledStates {
    fn default() -> Self {
        Self {
            cursor: true,
            fade_in: true,
            fade_out: true,
            select: true,
            shift: true,
            record: true,
        }
    }
}
