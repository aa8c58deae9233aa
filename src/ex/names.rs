//! Command-name recognition: the canonical name table and abbreviation
//! expansion.

/// The closed, ordered table of `(full name, shortest abbreviation)` pairs.
/// An empty abbreviation means only the full form is accepted. Order is
/// significant: [`expand`] returns the first match.
const COMMAND_NAMES: &[(&str, &str)] = &[
    ("close", "clo"),
    ("cmap", "cm"),
    ("cmapclear", "cmapc"),
    ("cnoremap", "cno"),
    ("cunmap", "cu"),
    ("delete", "d"),
    ("display", "di"),
    ("edit", "e"),
    ("exit", "exi"),
    ("fold", "fo"),
    ("imap", "im"),
    ("imapclear", "imapc"),
    ("inoremap", "ino"),
    ("iunmap", "iu"),
    ("join", "j"),
    ("lmap", "lm"),
    ("lmapclear", "lmapc"),
    ("lnoremap", "ln"),
    ("lunmap", "lu"),
    ("make", "mak"),
    ("map", "map"),
    ("mapclear", "mapc"),
    ("marks", "marks"),
    ("nmap", "nm"),
    ("nmapclear", "nmapc"),
    ("nnoremap", "nn"),
    ("nohlsearch", "noh"),
    ("noremap", "no"),
    ("nunmap", "nun"),
    ("omap", "om"),
    ("omapclear", "omapc"),
    ("onoremap", "ono"),
    ("ounmap", "ou"),
    ("put", "pu"),
    ("qall", "qa"),
    ("quit", "q"),
    ("quitall", "quita"),
    ("redo", "red"),
    ("registers", "reg"),
    ("retab", "ret"),
    ("set", "se"),
    ("smagic", "sm"),
    ("smap", "smap"),
    ("smapclear", "smapc"),
    ("snomagic", "sno"),
    ("snoremap", "snor"),
    ("source", "so"),
    ("split", "sp"),
    ("substitute", "s"),
    ("sunmap", "sunm"),
    ("tabfirst", "tabfir"),
    ("tablast", "tabl"),
    ("tabnext", "tabn"),
    ("tabNext", "tabN"),
    ("tabprevious", "tabp"),
    ("tabrewind", "tabr"),
    ("undo", "u"),
    ("unmap", "unm"),
    ("vmap", "vm"),
    ("vmapclear", "vmapc"),
    ("vnoremap", "vn"),
    ("vunmap", "vu"),
    ("wq", ""),
    ("xit", "x"),
    ("xmap", "xm"),
    ("xmapclear", "xmapc"),
    ("xnoremap", "xn"),
    ("xunmap", "xu"),
    ("yank", "y"),
    ("&", ""),
    ("~", ""),
    ("<", ""),
    (">", ""),
    ("/", ""),
    ("?", ""),
];

/// Expands an abbreviated command name to its canonical form.
///
/// Returns the first table entry whose full name equals `input`, or whose
/// abbreviation prefixes `input` while `input` prefixes the full name.
/// Unrecognized input comes back unchanged. Idempotent: every full name
/// expands to itself.
pub fn expand(input: &str) -> &str {
    for (full, abbrev) in COMMAND_NAMES {
        if input == *full {
            return full;
        }
        if !abbrev.is_empty() && input.starts_with(abbrev) && full.starts_with(input) {
            return full;
        }
    }
    input
}
