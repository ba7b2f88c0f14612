//! The flat halachic configuration surface the engine consumes.
//!
//! The exact option set mirrors the application's stored settings record,
//! narrowed to what the core algorithms read. Presentation, location and
//! sync options live with their own layers.

use serde::{Deserialize, Serialize};

/// Halachic calculation settings.
///
/// Every field is a plain toggle or count; each maps to one predicate or
/// transform inside detection, projection or milestone generation, and they
/// compose additively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flag the thirty-first day in addition to the thirtieth
    /// (Onah Beinonis stringency).
    pub keep_thirty_one: bool,
    /// Flag both onahs of the beinonis days, not only the onset's portion.
    pub onah_beinonis_24_hours: bool,
    /// Add the Ohr Zarua flag on the onah immediately preceding every
    /// flagged onah.
    pub show_ohr_zeruah: bool,
    /// Keep flagging past haflagas longer than the current one until they
    /// are overridden (the Ta"z).
    pub keep_longer_haflagah: bool,
    /// Suppress flags that fall within the seven days after the most
    /// recent entry.
    pub no_probs_after_entry: bool,
    /// Allow kavuah detection across differing night/day onahs (the more
    /// stringent opinion).
    pub kavuah_diff_onahs: bool,
    /// Detect Haflaga-of-Onahs kavuahs (Shulchan Aruch Harav).
    pub haflaga_of_onahs: bool,
    /// Let a Dilug Yom-HaChodesh kavuah run past the ends of the month.
    pub dilug_chodesh_past_ends: bool,
    /// Use four days to the hefsek tahara instead of five (common
    /// Sephardic custom).
    pub four_day_hefsek: bool,
    /// How many months ahead flagged dates are projected.
    pub number_months_ahead_to_warn: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keep_thirty_one: true,
            onah_beinonis_24_hours: false,
            show_ohr_zeruah: false,
            keep_longer_haflagah: false,
            no_probs_after_entry: false,
            kavuah_diff_onahs: false,
            haflaga_of_onahs: false,
            dilug_chodesh_past_ends: false,
            four_day_hefsek: false,
            number_months_ahead_to_warn: 12,
        }
    }
}
