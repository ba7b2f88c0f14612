//! # vesset-core
//!
//! The cycle-pattern engine behind a halachic period-tracking calendar:
//! entries (observed onsets), kavuah detection (nine recurrence families),
//! flagged-date projection, tahara milestones and day-status resolution.
//!
//! ## Architecture
//!
//! Everything here is a pure, synchronous value computation over
//! [`vesset_calendar::HebrewDate`]:
//!
//! - [`onah`]: the atomic half-day unit (night/day of one date)
//! - [`entry`] / [`entry_list`]: the observation record and its log,
//!   with the derived "effective" view that carries haflaga intervals
//! - [`kavuah`]: recurrence patterns: detection, matching, breaking
//! - [`flagged`]: the forward projector producing restriction flags
//! - [`tahara`]: derived ritual milestones (hefsek, bedikas, mikvah)
//! - [`status`]: the binary niddah/tahara day resolver
//! - [`settings`]: the flat halachic configuration surface
//!
//! No I/O, no locking, no global state: persistence and presentation are
//! external layers that feed an [`entry_list::EntryList`] and a kavuah
//! slice in and read derived values out. Derived views are recomputed on
//! every call and are deterministic and order-stable, so callers may cache
//! freely.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod entry;
pub mod entry_list;
pub mod flagged;
pub mod kavuah;
pub mod onah;
pub mod settings;
pub mod status;
pub mod tahara;

pub use entry::{EffectiveEntry, Entry, EntryId, EntryIdError};
pub use entry_list::EntryList;
pub use flagged::{FlaggedDatesGenerator, ProblemFlag, ProblemOnah};
pub use kavuah::detect::{
    find_broken_kavuahs, find_out_of_pattern, find_reawakened_kavuahs, kavuah_suggestions,
    possible_new_kavuahs, KavuahSuggestion,
};
pub use kavuah::{Kavuah, KavuahId, KavuahIdError, KavuahKind};
pub use onah::{NightDay, Onah};
pub use settings::Settings;
pub use status::{NiddahStatus, StatusCalculator};
pub use tahara::{generate_tahara_events, TaharaEvent, TaharaEventKind};
