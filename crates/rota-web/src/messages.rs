//! German user-facing message catalog.
//!
//! One constant per message key; views and redirects only ever reference
//! these, never inline strings.

/// `password-mismatch`
pub const PASSWORD_MISMATCH: &str =
  "Die eingegebenen Passwörter stimmen nicht überein.";

/// `access-denied`
pub const ACCESS_DENIED: &str =
  "Sorry, du darfst das leider nicht. Frag gegebenenfalls die Clubleitung.";

/// `event-doesnt-exist`
pub const EVENT_DOESNT_EXIST: &str =
  "Diese Veranstaltung existiert nicht (mehr).";

/// `event-delete-ok`
pub const EVENT_DELETE_OK: &str =
  "Veranstaltung und zugehöriger Dienstplan gelöscht.";
