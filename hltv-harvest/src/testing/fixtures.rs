//! Synthetic pages shaped like the statistics site's markup.

use std::fmt::Write;

use crate::model::MatchReference;

/// Team 1 id used by [`MatchPageFixture`] unless overridden.
pub const TEAM1_ID: u64 = 4608;
/// Team 2 id used by [`MatchPageFixture`] unless overridden.
pub const TEAM2_ID: u64 = 5995;
/// Event id used by [`MatchPageFixture`].
pub const EVENT_ID: u64 = 7148;

/// One map block of a [`MatchPageFixture`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapFixture {
    /// A played map.
    Played {
        /// Map name.
        name: String,
        /// Map stats id.
        map_id: u64,
        /// Left team rounds.
        left: u32,
        /// Right team rounds.
        right: u32,
        /// Overtime totals `(left, right)`.
        overtime: Option<(u32, u32)>,
    },
    /// A map awarded by forfeit; `left_won` picks the winner.
    Default {
        /// Whether the left team was awarded the map.
        left_won: bool,
    },
    /// A voided map.
    Tie {
        /// Map name.
        name: String,
    },
    /// An unplayed decider.
    Optional {
        /// Map name.
        name: String,
    },
    /// A map that was never scheduled.
    Tba,
}

impl MapFixture {
    /// Creates a played map without overtime.
    #[must_use]
    pub fn played(name: impl Into<String>, map_id: u64, left: u32, right: u32) -> Self {
        Self::Played {
            name: name.into(),
            map_id,
            left,
            right,
            overtime: None,
        }
    }

    /// Creates a played map that went to overtime.
    #[must_use]
    pub fn overtime(name: impl Into<String>, map_id: u64, left_ot: u32, right_ot: u32) -> Self {
        Self::Played {
            name: name.into(),
            map_id,
            left: 15 + left_ot,
            right: 15 + right_ot,
            overtime: Some((left_ot, right_ot)),
        }
    }

    fn render(&self, team1: &str, team2: &str, out: &mut String) {
        match self {
            Self::Played {
                name,
                map_id,
                left,
                right,
                overtime,
            } => {
                let (left_class, right_class) = if left > right {
                    ("results-left won pick", "results-right lost")
                } else {
                    ("results-left lost", "results-right won pick")
                };
                let (l_reg, r_reg) = match overtime {
                    Some((l, r)) => (left - l, right - r),
                    None => (*left, *right),
                };
                let (l_ct, r_t) = (l_reg / 2, r_reg / 2);
                let (l_t, r_ct) = (l_reg - l_ct, r_reg - r_t);
                let mut half = format!(
                    "<span>(</span><span class=\"ct\">{l_ct}</span><span>:</span><span class=\"t\">{r_t}</span><span>;</span>\n \
                     <span class=\"t\">{l_t}</span><span>:</span><span class=\"ct\">{r_ct}</span><span>)</span>"
                );
                if let Some((l, r)) = overtime {
                    let _ = write!(
                        half,
                        "<span>(</span><span>OT</span><span>{l}</span><span>:</span><span>{r}</span><span>)</span>"
                    );
                }
                let _ = write!(
                    out,
                    r#"<div class="mapholder"><div class="played"><div class="mapname">{name}</div></div>
<div class="results played">
<div class="{left_class}"><div class="results-teamname text-ellipsis">{team1}</div><div class="results-team-score">{left}</div></div>
<div class="results-center"><div class="results-center-half-score">{half}</div></div>
<div class="{right_class}"><div class="results-teamname text-ellipsis">{team2}</div><div class="results-team-score">{right}</div></div>
</div>
<a href="/stats/matches/mapstatsid/{map_id}/fixture" class="results-stats">STATS</a>
</div>
"#
                );
            }
            Self::Default { left_won } => {
                let (left_class, right_class) = if *left_won {
                    ("results-left won", "results-right lost")
                } else {
                    ("results-left lost", "results-right won")
                };
                let _ = write!(
                    out,
                    r#"<div class="mapholder"><div class="played"><div class="mapname">Default</div></div>
<div class="results">
<div class="{left_class}"><div class="results-teamname">{team1}</div><div class="results-team-score">-</div></div>
<div class="{right_class}"><div class="results-teamname">{team2}</div><div class="results-team-score">-</div></div>
</div></div>
"#
                );
            }
            Self::Tie { name } => {
                let _ = write!(
                    out,
                    r#"<div class="mapholder"><div class="played"><div class="mapname">{name}</div></div>
<div class="results">
<div class="results-left tie"><div class="results-teamname">{team1}</div><div class="results-team-score">0</div></div>
<div class="results-right tie"><div class="results-teamname">{team2}</div><div class="results-team-score">0</div></div>
</div></div>
"#
                );
            }
            Self::Optional { name } => {
                let _ = write!(
                    out,
                    r#"<div class="mapholder"><div class="optional"><div class="mapname">{name}</div></div></div>
"#
                );
            }
            Self::Tba => {
                out.push_str(
                    r#"<div class="mapholder"><div class="played"><div class="mapname">TBA</div></div></div>
"#,
                );
            }
        }
    }
}

/// Builder for a complete match detail page.
#[derive(Debug, Clone)]
pub struct MatchPageFixture {
    team1: (u64, String),
    team2: (u64, String),
    won: (bool, bool),
    format: String,
    veto: Option<Vec<String>>,
    maps: Vec<MapFixture>,
    players_per_team: usize,
    unix_millis: i64,
}

impl Default for MatchPageFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchPageFixture {
    /// Creates a best-of-three LAN page with two played maps and full stats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            team1: (TEAM1_ID, "Natus Vincere".to_string()),
            team2: (TEAM2_ID, "G2".to_string()),
            won: (true, false),
            format: "Best of 3 (LAN)\n\n* Grand final".to_string(),
            veto: Some(
                [
                    "1. G2 removed Nuke",
                    "2. Natus Vincere removed Vertigo",
                    "3. G2 picked Mirage",
                    "4. Natus Vincere picked Inferno",
                    "5. G2 removed Overpass",
                    "6. Natus Vincere removed Anubis",
                    "7. Ancient was left over",
                ]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ),
            maps: vec![
                MapFixture::played("Mirage", 150_001, 16, 12),
                MapFixture::played("Inferno", 150_002, 16, 9),
                MapFixture::Optional {
                    name: "Ancient".to_string(),
                },
            ],
            players_per_team: 5,
            unix_millis: 1_696_512_000_000,
        }
    }

    /// Sets team 1.
    #[must_use]
    pub fn with_team1(mut self, id: u64, name: impl Into<String>) -> Self {
        self.team1 = (id, name.into());
        self
    }

    /// Sets team 2.
    #[must_use]
    pub fn with_team2(mut self, id: u64, name: impl Into<String>) -> Self {
        self.team2 = (id, name.into());
        self
    }

    /// Sets the `won` markers of team 1 and team 2.
    #[must_use]
    pub fn with_won(mut self, team1: bool, team2: bool) -> Self {
        self.won = (team1, team2);
        self
    }

    /// Sets the format text, e.g. `"Best of 1 (Online) * Group stage"`.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Replaces the veto lines.
    #[must_use]
    pub fn with_veto<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.veto = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Drops the second veto box, as on a forfeited match.
    #[must_use]
    pub fn without_veto(mut self) -> Self {
        self.veto = None;
        self
    }

    /// Replaces the map blocks.
    #[must_use]
    pub fn with_maps(mut self, maps: Vec<MapFixture>) -> Self {
        self.maps = maps;
        self
    }

    /// Sets players per team; zero removes the stats containers.
    #[must_use]
    pub fn with_players_per_team(mut self, players: usize) -> Self {
        self.players_per_team = players;
        self
    }

    /// Player ids of a team in table order.
    #[must_use]
    pub fn player_ids(&self, team: usize) -> Vec<u64> {
        let base = if team == 1 { 1_000 } else { 2_000 };
        (0..self.players_per_team as u64).map(|i| base + i).collect()
    }

    /// Map stats ids of the played maps, in page order.
    #[must_use]
    pub fn played_map_ids(&self) -> Vec<u64> {
        self.maps
            .iter()
            .filter_map(|m| match m {
                MapFixture::Played { map_id, .. } => Some(*map_id),
                _ => None,
            })
            .collect()
    }

    fn render_team_tables(&self, team: usize, with_identity: bool, out: &mut String) {
        let ids = self.player_ids(team);
        let row = |id: u64, kd: &str, adr: &str, identity: bool| {
            let profile = if identity {
                format!(
                    "<img class=\"flag\" title=\"Country{team}\"><div class=\"statsPlayerName\">Player {id}</div>"
                )
            } else {
                String::new()
            };
            format!(
                "<tr><td class=\"players\"><a class=\"flagAlign\" href=\"/player/{id}/p{id}\">{profile}<span class=\"player-nick\">p{id}</span></a></td>\
                 <td class=\"kd\">{kd}</td><td class=\"adr\">{adr}</td></tr>"
            )
        };

        for side in 0..3 {
            out.push_str("<table class=\"table totalstats\"><tr class=\"header-row\"><td>Player</td></tr>");
            for (i, id) in ids.iter().enumerate() {
                let kills = 10 + i;
                let (kd, adr) = match side {
                    0 => (format!("{}-{}", kills * 2, 30), "80.5".to_string()),
                    1 => (format!("{kills}-15"), "75.0".to_string()),
                    _ => (format!("{kills}-15"), if i == 0 { "-".to_string() } else { "86.0".to_string() }),
                };
                out.push_str(&row(*id, &kd, &adr, with_identity && side == 0));
            }
            out.push_str("</table>");
        }
    }

    fn render_container(&self, id: &str, out: &mut String) {
        let with_identity = id == crate::extract::AGGREGATE_CONTAINER_ID;
        let _ = write!(out, "<div class=\"stats-content\" id=\"{id}\">");
        self.render_team_tables(1, with_identity, out);
        self.render_team_tables(2, with_identity, out);
        out.push_str("</div>\n");
    }

    /// Renders the page.
    #[must_use]
    pub fn render(&self) -> String {
        let (t1_id, t1_name) = &self.team1;
        let (t2_id, t2_name) = &self.team2;
        let marker = |won: bool| if won { ("won", 2) } else { ("lost", 0) };
        let (t1_class, t1_score) = marker(self.won.0);
        let (t2_class, t2_score) = marker(self.won.1);

        let mut page = String::from("<!DOCTYPE html><html><body><div class=\"match-page\">\n");
        let _ = write!(
            page,
            r#"<div class="teamsBox">
<div class="team"><div class="team1-gradient"><a href="/team/{t1_id}/t1"><img alt="{t1_name}"><div class="teamName">{t1_name}</div></a><div class="{t1_class}">{t1_score}</div></div></div>
<div class="timeAndEvent"><div class="time" data-unix="{unix}">18:00</div><div class="date" data-unix="{unix}">5th of October 2023</div>
<div class="event text-ellipsis"><a href="/events/{EVENT_ID}/fixture-cup" title="Fixture Cup">Fixture Cup</a></div></div>
<div class="team"><div class="team2-gradient"><a href="/team/{t2_id}/t2"><div class="teamName">{t2_name}</div></a><div class="{t2_class}">{t2_score}</div></div></div>
</div>
"#,
            unix = self.unix_millis
        );

        let _ = write!(
            page,
            "<div class=\"g-grid maps\"><div class=\"col-6 col-7-small\">\n\
             <div class=\"standard-box veto-box\"><div class=\"padding preformatted-text\">{}</div></div>\n",
            self.format
        );
        if let Some(lines) = &self.veto {
            page.push_str("<div class=\"standard-box veto-box\"><div class=\"padding\">\n");
            for line in lines {
                let _ = writeln!(page, "<div>{line}</div>");
            }
            page.push_str("</div></div>\n");
        }
        page.push_str("</div><div class=\"col-6 col-7-small\">\n");
        for map in &self.maps {
            map.render(t1_name, t2_name, &mut page);
        }
        page.push_str("</div></div>\n");

        if self.players_per_team > 0 {
            page.push_str("<div class=\"matchstats\">\n");
            self.render_container(crate::extract::AGGREGATE_CONTAINER_ID, &mut page);
            for map_id in self.played_map_ids() {
                self.render_container(&format!("{map_id}-content"), &mut page);
            }
            page.push_str("</div>\n");
        }

        page.push_str("</div></body></html>");
        page
    }
}

/// Renders one results listing page.
#[must_use]
pub fn listing_page(entries: &[MatchReference], offset: usize, total: usize) -> String {
    let mut page = String::from("<html><body><div class=\"results-all\">\n");
    for entry in entries {
        let _ = writeln!(
            page,
            "<div class=\"result-con\" data-zonedgrouping-entry-unix=\"0\"><a href=\"{}\" class=\"a-reset\"><div class=\"result\">x</div></a></div>",
            entry.link
        );
    }
    let _ = write!(
        page,
        "</div><div class=\"pagination-component\"><span class=\"pagination-data\">{} - {} of {total}</span></div></body></html>",
        offset + 1,
        offset + entries.len()
    );
    page
}

/// References `/matches/{id}/fixture-{id}` for ids `start..start + count`.
#[must_use]
pub fn references(start: u64, count: usize) -> Vec<MatchReference> {
    (start..start + count as u64)
        .map(|id| MatchReference::new(id, format!("/matches/{id}/fixture-{id}")))
        .collect()
}

/// Renders the rankings page with one profile link per team.
#[must_use]
pub fn rankings_page(team_ids: &[u64]) -> String {
    let mut page = String::from("<html><body><div class=\"ranking\">\n");
    for id in team_ids {
        let _ = writeln!(
            page,
            "<div class=\"ranked-team\"><a class=\"moreLink\" href=\"/team/{id}/t{id}\">HLTV Team profile</a>\
             <a class=\"moreLink\" href=\"/stats/teams/{id}/t{id}\">Stats</a></div>"
        );
    }
    page.push_str("</div></body></html>");
    page
}
