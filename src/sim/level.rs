/// Level file loader.
///
/// ## File format (plain text):
///   ```text
///   # comment lines start with '#' and are skipped entirely
///   Player = @          ← one legend line per role, exactly once each
///   Boulder = o
///   Pit = ^
///   Floor = .
///   Wall = +
///   First Level         ← alphabetic first character starts a named level
///    +++++              ← other lines are map rows for the open level
///    +@o^+
///    +++++
///   Second Level
///    ...
///   ```
///
/// Rules enforced here, in scan order:
///   - an empty file, or any blank line anywhere, fails
///   - the first five non-comment lines are the legend; each must name a
///     recognized role, define it once, and use a fresh symbol
///   - level names are truncated to a maximum length, must be unique, and
///     a file may hold at most a configured number of levels
///   - a name line followed by another name line (or end of file), with no
///     map rows between, is an empty level and fails
///
/// Resolving a level pads its rows to a rectangle and wraps it in a
/// one-square blank border, then checks playability: exactly one player,
/// at least one pit, and at least as many boulders as pits. Blank padding
/// loads as floor, so a level that does not wall itself in is open at the
/// edges rather than a special case.

use std::path::Path;

use thiserror::Error;

use crate::config::Limits;

/// Lines whose first character is this are skipped. Map rows are indented
/// one space by convention so a leading wall symbol never collides.
pub const COMMENT: char = '#';

// ── Roles and legend ──

/// The closed set of semantic roles a legend line may name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Player,
    Boulder,
    Pit,
    Floor,
    Wall,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Player,
        Role::Boulder,
        Role::Pit,
        Role::Floor,
        Role::Wall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Boulder => "Boulder",
            Role::Pit => "Pit",
            Role::Floor => "Floor",
            Role::Wall => "Wall",
        }
    }

    fn from_name(name: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// "Player, Boulder, Pit, Floor, Wall." — used by the unknown-role error.
    fn list_for_error() -> String {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.name()).collect();
        format!("{}.", names.join(", "))
    }
}

/// Role → display character mapping. Complete by construction: parsing
/// fails unless every role got exactly one symbol and no symbol repeats.
#[derive(Clone, Copy, Debug)]
pub struct Legend {
    symbols: [char; Role::ALL.len()],
}

impl Legend {
    pub fn symbol(&self, role: Role) -> char {
        self.symbols[role as usize]
    }

    /// Reverse lookup; characters outside the legend have no role.
    pub fn role_of(&self, ch: char) -> Option<Role> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| self.symbols[*r as usize] == ch)
    }
}

// ── Errors ──

/// Load failure: either the file could not be read at all, or its content
/// violates the format. Callers can tell "fix your path" from "fix your
/// level file" by the variant.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not open file '{path}'")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Malformed(#[from] MalformedLevel),
}

#[derive(Debug, Error)]
pub enum MalformedLevel {
    #[error("file '{file}' is empty")]
    EmptyFile { file: String },
    #[error("blank line found in file '{file}'")]
    BlankLine { file: String },
    #[error("bad legend line '{line}' in file '{file}' (expected 'Role = symbol')")]
    BadLegendLine { line: String, file: String },
    #[error(
        "unrecognized symbol type '{name}' found in file '{file}'. \
         Recognized symbol types are: {valid}"
    )]
    UnknownRole {
        name: String,
        file: String,
        valid: String,
    },
    #[error("symbol type '{name}' defined more than once in file '{file}'")]
    DuplicateRole { name: String, file: String },
    #[error("symbol '{symbol}' used for more than one symbol type in file '{file}'")]
    SymbolReused { symbol: char, file: String },
    #[error("missing legend entry for '{name}' in file '{file}'")]
    MissingRole { name: String, file: String },
    #[error("empty level '{name}' found in file '{file}'")]
    EmptyLevel { name: String, file: String },
    #[error("no level names found in file '{file}'")]
    NoLevels { file: String },
    #[error("more than {max} levels found in file '{file}'")]
    TooManyLevels { max: usize, file: String },
    #[error("duplicate level name '{name}' found in file '{file}'")]
    DuplicateLevelName { name: String, file: String },
    #[error("no level named '{name}' in file '{file}'")]
    NoSuchLevel { name: String, file: String },
    #[error("level '{name}' in file '{file}' does not have exactly one player '{symbol}'")]
    PlayerCount {
        name: String,
        file: String,
        symbol: char,
    },
    #[error("level '{name}' in file '{file}' has no pits '{symbol}'")]
    NoPits {
        name: String,
        file: String,
        symbol: char,
    },
    #[error(
        "level '{name}' in file '{file}' does not have enough boulders \
         ({boulders}) to fill the pits ({pits})"
    )]
    NotEnoughBoulders {
        name: String,
        file: String,
        boulders: usize,
        pits: usize,
    },
}

// ── Parsed file ──

/// A parsed level file: legend plus named, unpadded level bodies.
/// Resolving a level by name or index pads and validates it.
pub struct LevelFile {
    file: String,
    legend: Legend,
    levels: Vec<(String, Vec<String>)>,
}

/// One level, padded and validated, ready to build a universe from.
#[derive(Clone, Debug)]
pub struct ResolvedLevel {
    pub name: String,
    pub legend: Legend,
    /// Rectangular char grid with the one-square blank border applied.
    pub map: Vec<Vec<char>>,
}

impl LevelFile {
    /// Read and parse a level file from disk.
    pub fn open(path: &Path, limits: &Limits) -> Result<LevelFile, LevelError> {
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::FileAccess {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string(), limits)
    }

    /// Parse level file content. `file` is only used in error messages.
    pub fn parse(content: &str, file: &str, limits: &Limits) -> Result<LevelFile, LevelError> {
        if content.is_empty() {
            return Err(MalformedLevel::EmptyFile { file: file.into() }.into());
        }

        let mut symbols: [Option<char>; Role::ALL.len()] = [None; Role::ALL.len()];
        let mut legend_lines_seen = 0;
        let mut levels: Vec<(String, Vec<String>)> = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                return Err(MalformedLevel::BlankLine { file: file.into() }.into());
            }
            if line.starts_with(COMMENT) {
                continue;
            }
            if legend_lines_seen < Role::ALL.len() {
                legend_lines_seen += 1;
                parse_legend_line(line, file, &mut symbols)?;
                continue;
            }
            if line.chars().next().is_some_and(|c| c.is_alphabetic()) {
                let mut name: String = line.chars().take(limits.max_level_name_len).collect();
                name.truncate(name.trim_end().len());
                if levels.iter().any(|(n, _)| *n == name) {
                    return Err(MalformedLevel::DuplicateLevelName {
                        name,
                        file: file.into(),
                    }
                    .into());
                }
                levels.push((name, Vec::new()));
            } else if let Some((_, rows)) = levels.last_mut() {
                rows.push(line.trim_end().to_string());
            } else {
                // Map rows before the first name line belong to no level.
                log::debug!("ignoring unowned map row in '{file}': {line}");
            }
        }

        for (role, slot) in Role::ALL.iter().zip(&symbols) {
            if slot.is_none() {
                return Err(MalformedLevel::MissingRole {
                    name: role.name().into(),
                    file: file.into(),
                }
                .into());
            }
        }
        let legend = Legend {
            symbols: symbols.map(|s| s.unwrap_or(' ')),
        };

        if levels.is_empty() {
            return Err(MalformedLevel::NoLevels { file: file.into() }.into());
        }
        if levels.len() > limits.max_levels_per_file {
            return Err(MalformedLevel::TooManyLevels {
                max: limits.max_levels_per_file,
                file: file.into(),
            }
            .into());
        }
        if let Some((name, _)) = levels.iter().find(|(_, rows)| rows.is_empty()) {
            return Err(MalformedLevel::EmptyLevel {
                name: name.clone(),
                file: file.into(),
            }
            .into());
        }

        Ok(LevelFile {
            file: file.into(),
            legend,
            levels,
        })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn legend(&self) -> Legend {
        self.legend
    }

    pub fn level_names(&self) -> Vec<&str> {
        self.levels.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Resolve by name. An exact match wins; otherwise the first level
    /// whose name starts with `name` is taken, as a selection convenience.
    pub fn by_name(&self, name: &str) -> Result<ResolvedLevel, LevelError> {
        let idx = self
            .levels
            .iter()
            .position(|(n, _)| n == name)
            .or_else(|| self.levels.iter().position(|(n, _)| n.starts_with(name)))
            .ok_or_else(|| MalformedLevel::NoSuchLevel {
                name: name.into(),
                file: self.file.clone(),
            })?;
        self.by_index(idx)
    }

    pub fn by_index(&self, idx: usize) -> Result<ResolvedLevel, LevelError> {
        let (name, rows) = &self.levels[idx];
        let map = pad_map(rows);
        self.check_playable(name, &map)?;
        Ok(ResolvedLevel {
            name: name.clone(),
            legend: self.legend,
            map,
        })
    }

    /// Exactly one player, at least one pit, boulders >= pits.
    fn check_playable(&self, name: &str, map: &[Vec<char>]) -> Result<(), LevelError> {
        let count = |role: Role| {
            let sym = self.legend.symbol(role);
            map.iter()
                .map(|row| row.iter().filter(|&&c| c == sym).count())
                .sum::<usize>()
        };
        let players = count(Role::Player);
        let pits = count(Role::Pit);
        let boulders = count(Role::Boulder);

        if players != 1 {
            return Err(MalformedLevel::PlayerCount {
                name: name.into(),
                file: self.file.clone(),
                symbol: self.legend.symbol(Role::Player),
            }
            .into());
        }
        if pits == 0 {
            return Err(MalformedLevel::NoPits {
                name: name.into(),
                file: self.file.clone(),
                symbol: self.legend.symbol(Role::Pit),
            }
            .into());
        }
        if boulders < pits {
            return Err(MalformedLevel::NotEnoughBoulders {
                name: name.into(),
                file: self.file.clone(),
                boulders,
                pits,
            }
            .into());
        }
        Ok(())
    }
}

fn parse_legend_line(
    line: &str,
    file: &str,
    symbols: &mut [Option<char>; Role::ALL.len()],
) -> Result<(), LevelError> {
    let (name, symbol) = line.split_once('=').ok_or_else(|| MalformedLevel::BadLegendLine {
        line: line.into(),
        file: file.into(),
    })?;
    let name = name.trim();
    let symbol = symbol.trim();

    let mut chars = symbol.chars();
    let symbol = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(MalformedLevel::BadLegendLine {
                line: line.into(),
                file: file.into(),
            }
            .into())
        }
    };

    let role = Role::from_name(name).ok_or_else(|| MalformedLevel::UnknownRole {
        name: name.into(),
        file: file.into(),
        valid: Role::list_for_error(),
    })?;
    if symbols[role as usize].is_some() {
        return Err(MalformedLevel::DuplicateRole {
            name: name.into(),
            file: file.into(),
        }
        .into());
    }
    if symbols.iter().any(|s| *s == Some(symbol)) {
        return Err(MalformedLevel::SymbolReused {
            symbol,
            file: file.into(),
        }
        .into());
    }
    symbols[role as usize] = Some(symbol);
    Ok(())
}

/// Pad rows to a rectangle, then wrap in a one-square blank border so
/// pushes at the level edge need no special casing.
fn pad_map(rows: &[String]) -> Vec<Vec<char>> {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut map: Vec<Vec<char>> = Vec::with_capacity(rows.len() + 2);
    map.push(vec![' '; width + 2]);
    for row in rows {
        let mut padded = Vec::with_capacity(width + 2);
        padded.push(' ');
        padded.extend(row.chars());
        padded.resize(width + 1, ' ');
        padded.push(' ');
        map.push(padded);
    }
    map.push(vec![' '; width + 2]);
    map
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const LEGEND: &str = "Player = @\nBoulder = o\nPit = ^\nFloor = .\nWall = +\n";

    fn limits() -> Limits {
        Limits::default()
    }

    fn parse(content: &str) -> Result<LevelFile, LevelError> {
        LevelFile::parse(content, "test.txt", &limits())
    }

    fn with_legend(body: &str) -> String {
        format!("{LEGEND}{body}")
    }

    fn malformed<T>(result: Result<T, LevelError>) -> MalformedLevel {
        match result {
            Err(LevelError::Malformed(m)) => m,
            other => panic!("expected malformed error, got {:?}", other.map(|_| ())),
        }
    }

    // ── File-level structure ──

    #[test]
    fn empty_file_rejected() {
        assert!(matches!(malformed(parse("")), MalformedLevel::EmptyFile { .. }));
    }

    #[test]
    fn blank_line_rejected_anywhere() {
        let text = with_legend("Level One\n @o^\n\n");
        assert!(matches!(malformed(parse(&text)), MalformedLevel::BlankLine { .. }));
    }

    #[test]
    fn comment_lines_are_skipped() {
        let text = format!("# a comment\n{LEGEND}# another\nLevel One\n @o^\n");
        let f = parse(&text).unwrap();
        assert_eq!(f.level_names(), ["Level One"]);
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = with_legend("Level One\n @o^\nLevel Two\n @oo^^\n");
        let a = parse(&text).unwrap();
        let b = parse(&text).unwrap();
        assert_eq!(a.level_names(), b.level_names());
        assert_eq!(
            a.by_name("Level One").unwrap().map,
            b.by_name("Level One").unwrap().map,
        );
    }

    // ── Legend ──

    #[test]
    fn unknown_role_lists_valid_names() {
        let text = "Player = @\nBoulder = o\nPit = ^\nFloor = .\nGold = $\nL\n @o^\n";
        match malformed(parse(text)) {
            MalformedLevel::UnknownRole { name, valid, .. } => {
                assert_eq!(name, "Gold");
                assert!(valid.contains("Wall"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_role_rejected() {
        let text = "Player = @\nPlayer = P\nPit = ^\nFloor = .\nWall = +\nL\n @^\n";
        assert!(matches!(
            malformed(parse(text)),
            MalformedLevel::DuplicateRole { .. }
        ));
    }

    #[test]
    fn reused_symbol_rejected() {
        let text = "Player = @\nBoulder = @\nPit = ^\nFloor = .\nWall = +\nL\n @^\n";
        match malformed(parse(text)) {
            MalformedLevel::SymbolReused { symbol, .. } => assert_eq!(symbol, '@'),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_role_rejected() {
        let text = "Player = @\nBoulder = o\nPit = ^\nFloor = .\n";
        match malformed(parse(text)) {
            MalformedLevel::MissingRole { name, .. } => assert_eq!(name, "Wall"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn short_legend_eats_following_line() {
        // With only four legend lines, the name line is consumed as the
        // fifth legend line and fails there.
        let text = "Player = @\nBoulder = o\nPit = ^\nFloor = .\nL\n @o^\n";
        assert!(matches!(
            malformed(parse(text)),
            MalformedLevel::BadLegendLine { .. }
        ));
    }

    #[test]
    fn multi_char_symbol_rejected() {
        let text = "Player = @@\nBoulder = o\nPit = ^\nFloor = .\nWall = +\nL\n @o^\n";
        assert!(matches!(
            malformed(parse(text)),
            MalformedLevel::BadLegendLine { .. }
        ));
    }

    #[test]
    fn legend_round_trip() {
        let f = parse(&with_legend("Level One\n @o^\n")).unwrap();
        let legend = f.legend();
        assert_eq!(legend.symbol(Role::Player), '@');
        assert_eq!(legend.symbol(Role::Wall), '+');
        assert_eq!(legend.role_of('^'), Some(Role::Pit));
        assert_eq!(legend.role_of('?'), None);
    }

    // ── Level names ──

    #[test]
    fn no_levels_rejected() {
        assert!(matches!(malformed(parse(LEGEND)), MalformedLevel::NoLevels { .. }));
    }

    #[test]
    fn adjacent_name_lines_are_an_empty_level() {
        let text = with_legend("First\nSecond\n @o^\n");
        match malformed(parse(&text)) {
            MalformedLevel::EmptyLevel { name, .. } => assert_eq!(name, "First"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn trailing_name_line_is_an_empty_level() {
        let text = with_legend("First\n @o^\nSecond\n");
        match malformed(parse(&text)) {
            MalformedLevel::EmptyLevel { name, .. } => assert_eq!(name, "Second"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_level_name_rejected() {
        let text = with_legend("Same\n @o^\nSame\n @o^\n");
        assert!(matches!(
            malformed(parse(&text)),
            MalformedLevel::DuplicateLevelName { .. }
        ));
    }

    #[test]
    fn too_many_levels_rejected() {
        let mut body = String::new();
        for i in 0..=limits().max_levels_per_file {
            body.push_str(&format!("Level{i}\n @o^\n"));
        }
        assert!(matches!(
            malformed(parse(&with_legend(&body))),
            MalformedLevel::TooManyLevels { .. }
        ));
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "L".repeat(80);
        let text = with_legend(&format!("{long}\n @o^\n"));
        let f = parse(&text).unwrap();
        assert_eq!(f.level_names()[0].len(), limits().max_level_name_len);
    }

    // ── Resolution and padding ──

    #[test]
    fn rows_padded_and_bordered() {
        let text = with_legend("Level One\n @o^\n .\n");
        let level = parse(&text).unwrap().by_name("Level One").unwrap();
        // Widest row " @o^" is 4 wide; +2 border columns.
        assert!(level.map.iter().all(|r| r.len() == 6));
        assert_eq!(level.map.len(), 4);
        assert!(level.map[0].iter().all(|&c| c == ' '));
        assert!(level.map[3].iter().all(|&c| c == ' '));
        assert_eq!(level.map[1], vec![' ', ' ', '@', 'o', '^', ' ']);
        assert_eq!(level.map[2], vec![' ', ' ', '.', ' ', ' ', ' ']);
    }

    #[test]
    fn prefix_match_selects_level() {
        let text = with_legend("Warehouse\n @o^\nWarm Up\n @@\n");
        let f = parse(&text).unwrap();
        assert_eq!(f.by_name("Ware").unwrap().name, "Warehouse");
        assert!(matches!(
            malformed(f.by_name("Basement")),
            MalformedLevel::NoSuchLevel { .. }
        ));
    }

    // ── Playability ──

    #[test]
    fn two_players_rejected() {
        let text = with_legend("Level One\n @@o^\n");
        assert!(matches!(
            malformed(parse(&text).unwrap().by_index(0)),
            MalformedLevel::PlayerCount { .. }
        ));
    }

    #[test]
    fn zero_players_rejected() {
        let text = with_legend("Level One\n o^\n");
        assert!(matches!(
            malformed(parse(&text).unwrap().by_index(0)),
            MalformedLevel::PlayerCount { .. }
        ));
    }

    #[test]
    fn no_pits_rejected() {
        let text = with_legend("Level One\n @o\n");
        assert!(matches!(
            malformed(parse(&text).unwrap().by_index(0)),
            MalformedLevel::NoPits { .. }
        ));
    }

    #[test]
    fn too_few_boulders_rejected() {
        let text = with_legend("Level One\n @o^^\n");
        match malformed(parse(&text).unwrap().by_index(0)) {
            MalformedLevel::NotEnoughBoulders { boulders, pits, .. } => {
                assert_eq!((boulders, pits), (1, 2));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn playable_level_resolves() {
        let text = with_legend("Level One\n +++++\n +@o^+\n +++++\n");
        let level = parse(&text).unwrap().by_name("Level One").unwrap();
        assert_eq!(level.name, "Level One");
    }
}
