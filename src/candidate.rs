//! Pairs a season/episode number with the local file most likely holding it.

use crate::media::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `s01e02`
    SeasonEpisode,
    /// `1x02`
    Cross,
}

/// One way of spelling a season/episode pair inside a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingStyle {
    pub marker: Marker,
    pub pad_season: bool,
    pub pad_episode: bool,
}

const fn style(marker: Marker, pad_season: bool, pad_episode: bool) -> NamingStyle {
    NamingStyle { marker, pad_season, pad_episode }
}

/// Ranked from most to least specific. The first style that matches any file wins.
pub const NAMING_STYLES: [NamingStyle; 8] = [
    style(Marker::SeasonEpisode, true, true),
    style(Marker::Cross, true, true),
    style(Marker::SeasonEpisode, false, true),
    style(Marker::Cross, false, true),
    style(Marker::SeasonEpisode, true, false),
    style(Marker::Cross, true, false),
    style(Marker::SeasonEpisode, false, false),
    style(Marker::Cross, false, false),
];

fn number(value: i32, pad: bool) -> Option<String> {
    if value < 0 {
        return None;
    }
    Some(if pad { format!("{value:02}") } else { value.to_string() })
}

impl NamingStyle {
    /// Lowercase needle for this style, or `None` if the numbers can't be spelled in it.
    pub fn render(&self, season: i32, episode: i32) -> Option<String> {
        let s = number(season, self.pad_season)?;
        let e = number(episode, self.pad_episode)?;
        Some(match self.marker {
            Marker::SeasonEpisode => format!("s{s}e{e}"),
            Marker::Cross => format!("{s}x{e}"),
        })
    }
}

/// Finds the file for `season`/`episode`.
///
/// Tries every [`NAMING_STYLES`] entry in order against the lowercased base
/// names; when none hits, settles for the first file whose name merely
/// contains the episode number.
pub fn find_candidate(season: i32, episode: i32, files: &[FileEntry]) -> Option<&FileEntry> {
    let lowered: Vec<String> = files.iter().map(|f| f.base_name.to_lowercase()).collect();

    let styled = NAMING_STYLES
        .iter()
        .filter_map(|style| style.render(season, episode))
        .find_map(|needle| lowered.iter().position(|name| name.contains(&needle)));

    let index = styled.or_else(|| {
        let plain = episode.to_string();
        lowered.iter().position(|name| name.contains(&plain))
    })?;

    log::debug!("S{season}E{episode} -> {}", files[index].base_name);
    files.get(index)
}
