use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use ratatui_image::StatefulImage;

use crate::{
    app::state::{App, Focus, LayoutRegions, ProjectPage, ReadmeState, Route},
    catalog::{NavTarget, Section},
    contact::{Field, SubmitStatus},
    player::{
        DemoPlayer,
        overlay::{ControlRegions, ControlsView},
    },
    ui::{
        markdown::document_lines,
        notifications::NotificationLevel,
        screenshot::ImageCache,
        theme::{Theme, get_theme},
    },
};

const ROUNDED_BORDER: border::Set = border::ROUNDED;
const CARD_HEIGHT: u16 = 8;
const VOLUME_SLIDER_WIDTH: u16 = 11;

fn block_with_title(title: &'_ str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDER)
        .title(title)
}

pub fn render(f: &mut Frame, app: &mut App, image_cache: &mut ImageCache) {
    let theme = get_theme();
    let area = f.area();

    let background = Block::default().style(Style::default().bg(theme.bg));
    f.render_widget(background, area);

    // Hit regions are rebuilt every frame.
    let mut regions = LayoutRegions::default();

    if let (true, Some(player)) = (app.is_fullscreen(), app.player.as_ref()) {
        regions.player = draw_player(f, area, player);
        draw_notifications(f, area, app);
        app.layout_regions = regions;
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(f, chunks[0], app, &mut regions);
    match &app.route {
        Route::Home => {
            image_cache.clear();
            draw_section(f, chunks[1], app, &mut regions);
        }
        Route::Project(page) => {
            draw_project_page(f, chunks[1], app, page, image_cache, &mut regions)
        }
    }
    draw_footer(f, chunks[2], app);
    draw_notifications(f, area, app);

    app.layout_regions = regions;
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let title = format!(" ◆ {} ", app.catalog.profile.name);
    let block = block_with_title(&title)
        .title_style(theme.title_style())
        .border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    let mut x = inner.x + 1;
    for (i, link) in app.catalog.nav.iter().enumerate() {
        let target = link.target();
        let label = match target {
            Some(NavTarget::External(_)) => format!(" {} ↗ ", link.name),
            _ => format!(" {} ", link.name),
        };
        let width = label.chars().count() as u16;
        if x + width > inner.right() {
            break;
        }

        let active = matches!(app.route, Route::Home)
            && target == Some(NavTarget::Section(app.section));
        let style = match target {
            _ if active => theme.selection_style().fg(theme.accent),
            Some(NavTarget::External(_)) => theme.label_style(),
            _ => theme.value_style(),
        };

        regions.tabs.push((Rect::new(x, inner.y, width, 1), i));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }

    let tabs_area = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(1),
        ..inner
    };
    f.render_widget(Paragraph::new(Line::from(spans)), tabs_area);
}

fn draw_section(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    match app.section {
        Section::Home => draw_hero(f, area, app, regions),
        Section::About => draw_about(f, area, app, regions),
        Section::Skills => draw_skills(f, area, app),
        Section::Experience => draw_experience(f, area, app, regions),
        Section::Projects => draw_projects(f, area, app, regions),
        Section::Contact => draw_contact(f, area, app, regions),
    }
}

/// Rows a list of lines occupies once wrapped to `width`.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

fn scrolling_panel(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'static>>,
    scroll: u16,
    regions: &mut LayoutRegions,
) {
    let theme = get_theme();
    let block = block_with_title(title).border_style(theme.border_style(false));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    regions.max_scroll = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(regions.max_scroll), 0));
    f.render_widget(paragraph, inner);
}

fn section_heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), theme.header_style()))
}

fn draw_hero(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let block = block_with_title(" ● Home ").border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);
    regions.hero = Some(inner);

    if let Some(field) = &app.particles {
        f.render_widget(field.widget(theme.particle), inner);
    }

    let profile = &app.catalog.profile;
    let lines = vec![
        Line::from(Span::styled("Hi, I'm", theme.label_style())),
        Line::from(Span::styled(
            profile.name.clone(),
            theme.title_style().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(Span::styled(profile.headline.clone(), theme.header_style())),
        Line::default(),
        Line::from(Span::styled(profile.roles.join("  ·  "), theme.tag_style())),
        Line::default(),
        Line::from(Span::styled(profile.tagline.clone(), theme.value_style())),
        Line::default(),
        Line::from(vec![
            Span::styled("Enter", theme.header_style()),
            Span::styled(" view projects", theme.label_style()),
        ]),
    ];

    let height = (lines.len() as u16).min(inner.height);
    let text_area = Rect {
        y: inner.y + inner.height.saturating_sub(height) / 2,
        height,
        ..inner
    };
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        text_area,
    );
}

fn draw_about(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let profile = &app.catalog.profile;

    let mut lines = vec![section_heading("About Me", theme), Line::default()];
    for paragraph in &profile.about {
        lines.push(Line::from(Span::styled(paragraph.clone(), theme.value_style())));
        lines.push(Line::default());
    }

    let mut fact = |label: &str, value: &str| {
        if !value.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(format!("{label:<10}"), theme.label_style()),
                Span::styled(value.to_string(), theme.value_style()),
            ]));
        }
    };
    fact("Location", &profile.location);
    fact("Email", &profile.email);
    fact("Phone", profile.phone.as_deref().unwrap_or_default());
    fact("Resume", profile.resume_url.as_deref().unwrap_or_default());

    scrolling_panel(f, area, " ● About ", lines, app.scroll, regions);
}

fn draw_skills(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let block = block_with_title(" ● Skills ").border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let categories = &app.catalog.skills;
    if categories.is_empty() {
        f.render_widget(
            Paragraph::new("No skills listed")
                .alignment(Alignment::Center)
                .style(theme.label_style()),
            inner,
        );
        return;
    }

    let columns = match inner.width {
        w if w >= 90 => 3,
        w if w >= 50 => 2,
        _ => 1,
    };
    let rows = categories.len().div_ceil(columns);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(inner);

    for (row, chunk) in categories.chunks(columns).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_areas[row]);

        for (category, cell) in chunk.iter().zip(cells.iter()) {
            let title = format!(" {} ", category.title);
            let lines: Vec<Line> = category
                .skills
                .iter()
                .map(|skill| {
                    Line::from(vec![
                        Span::styled("▸ ", Style::new().fg(theme.accent)),
                        Span::styled(skill.as_str(), theme.value_style()),
                    ])
                })
                .collect();
            f.render_widget(
                Paragraph::new(lines).block(
                    block_with_title(&title)
                        .title_style(theme.tag_style())
                        .border_style(theme.border_style(false)),
                ),
                *cell,
            );
        }
    }
}

fn draw_experience(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let mut lines = Vec::new();

    for exp in &app.catalog.experience {
        lines.push(Line::from(vec![
            Span::styled(exp.title.clone(), theme.title_style()),
            Span::styled(" @ ", theme.label_style()),
            Span::styled(exp.company.clone(), Style::new().fg(theme.accent)),
        ]));
        let mut meta = exp.period.clone();
        if !exp.location.is_empty() {
            meta.push_str(" · ");
            meta.push_str(&exp.location);
        }
        lines.push(Line::from(Span::styled(meta, theme.label_style())));
        if !exp.description.is_empty() {
            lines.push(Line::from(Span::styled(
                exp.description.clone(),
                theme.value_style(),
            )));
        }
        for highlight in &exp.highlights {
            lines.push(Line::from(vec![
                Span::styled("  ▸ ", Style::new().fg(theme.success)),
                Span::styled(highlight.clone(), theme.value_style()),
            ]));
        }
        lines.push(Line::default());
    }

    scrolling_panel(f, area, " ● Experience ", lines, app.scroll, regions);
}

fn draw_projects(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let block = block_with_title(" ● Projects ").border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let projects = &app.catalog.projects;
    if projects.is_empty() {
        f.render_widget(
            Paragraph::new("No projects yet")
                .alignment(Alignment::Center)
                .style(theme.label_style()),
            inner,
        );
        return;
    }

    let columns: usize = if inner.width >= 70 { 2 } else { 1 };
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected_project / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    for (index, project) in projects.iter().enumerate().skip(first_row * columns) {
        let row = index / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let col = index % columns;
        let width = inner.width / columns as u16;
        let card = Rect {
            x: inner.x + col as u16 * width,
            y: inner.y + row as u16 * CARD_HEIGHT,
            width,
            height: CARD_HEIGHT.min(inner.bottom().saturating_sub(inner.y + row as u16 * CARD_HEIGHT)),
        };
        if card.height < 3 {
            break;
        }

        let selected = index == app.selected_project;
        let hovered = app.hovered_card == Some(index);
        let border_style = if hovered {
            Style::new().fg(theme.accent_alt)
        } else {
            theme.border_style(selected)
        };
        let card_style = if hovered {
            Style::new().bg(theme.bg_highlight)
        } else {
            Style::new()
        };

        let title_style = if selected || hovered {
            theme.title_style()
        } else {
            theme.value_style().add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![
            Line::from(Span::styled(project.title.clone(), title_style)),
            Line::from(Span::styled(project.description.clone(), theme.label_style())),
        ];
        if !project.technologies.is_empty() {
            lines.push(Line::from(Span::styled(
                project.technologies.join(" · "),
                theme.tag_style(),
            )));
        }

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .style(card_style)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_set(ROUNDED_BORDER)
                        .border_style(border_style),
                ),
            card,
        );
        regions.project_cards.push((card, index));
    }
}

fn draw_contact(f: &mut Frame, area: Rect, app: &App, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // Contact details
    let profile = &app.catalog.profile;
    let mut info = vec![
        section_heading("Let's work together", theme),
        Line::default(),
        Line::from(vec![
            Span::styled("Email     ", theme.label_style()),
            Span::styled(profile.email.clone(), theme.value_style()),
        ]),
    ];
    if let Some(phone) = &profile.phone {
        info.push(Line::from(vec![
            Span::styled("Phone     ", theme.label_style()),
            Span::styled(phone.clone(), theme.value_style()),
        ]));
    }
    if !profile.location.is_empty() {
        info.push(Line::from(vec![
            Span::styled("Location  ", theme.label_style()),
            Span::styled(profile.location.clone(), theme.value_style()),
        ]));
    }
    info.push(Line::default());
    for social in &app.catalog.socials {
        info.push(Line::from(vec![
            Span::styled(format!("{:<10}", social.label), Style::new().fg(theme.accent)),
            Span::styled(social.href.clone(), theme.label_style()),
        ]));
    }
    f.render_widget(
        Paragraph::new(info)
            .wrap(Wrap { trim: false })
            .block(block_with_title(" ● Contact ").border_style(theme.border_style(false))),
        columns[0],
    );

    // Form
    let form_focused = app.focus == Focus::Form;
    let block = block_with_title(" ● Send a message ").border_style(theme.border_style(form_focused));
    let inner = block.inner(columns[1]);
    f.render_widget(block, columns[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

    let form = &app.contact;
    for (field, label, rect) in [
        (Field::Name, " Your Name ", rows[0]),
        (Field::Email, " Your Email ", rows[1]),
        (Field::Message, " Message ", rows[2]),
    ] {
        let focused = form_focused && form.focus == field;
        let mut value = form.field(field).to_string();
        if focused {
            value.push('▏');
        }
        f.render_widget(
            Paragraph::new(value)
                .style(theme.value_style())
                .wrap(Wrap { trim: false })
                .block(block_with_title(label).border_style(theme.border_style(focused))),
            rect,
        );
        regions.contact_fields.push((rect, field));
    }

    let send_focused = form_focused && form.focus == Field::Send;
    let send_label = match form.status() {
        SubmitStatus::Sending => format!("{} Sending...", app.loading.current_frame()),
        _ => "Send Message ➤".to_string(),
    };
    let send_width = (send_label.chars().count() as u16 + 4).min(rows[3].width);
    let send_rect = Rect {
        width: send_width,
        ..rows[3]
    };
    let send_style = if send_focused {
        theme.selection_style().fg(theme.accent)
    } else {
        theme.value_style()
    };
    f.render_widget(
        Paragraph::new(send_label)
            .alignment(Alignment::Center)
            .style(send_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(ROUNDED_BORDER)
                    .border_style(theme.border_style(send_focused)),
            ),
        send_rect,
    );
    regions.contact_fields.push((send_rect, Field::Send));

    let status = match form.status() {
        SubmitStatus::Sent { .. } => Some((
            "✔ Message sent successfully! I'll get back to you soon.".to_string(),
            theme.success,
        )),
        SubmitStatus::Failed { message, .. } => Some((format!("✖ {message}"), theme.error)),
        _ => None,
    };
    if let Some((text, color)) = status {
        f.render_widget(
            Paragraph::new(text)
                .style(Style::new().fg(color))
                .wrap(Wrap { trim: true }),
            rows[4],
        );
    }
}

fn draw_project_page(
    f: &mut Frame,
    area: Rect,
    app: &App,
    page: &ProjectPage,
    image_cache: &mut ImageCache,
    regions: &mut LayoutRegions,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let media_height = (columns[0].height / 2).clamp(8, 14);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(media_height),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    draw_back_bar(f, left[0], page, regions);
    match &app.player {
        Some(player) => regions.player = draw_player(f, left[1], player),
        None => draw_coming_soon(f, left[1]),
    }

    let lines = detail_lines(page, app);
    scrolling_panel(f, left[2], " ● Overview ", lines, app.scroll, regions);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Min(0)])
        .split(columns[1]);
    draw_screenshot(f, right[0], page, image_cache);
    draw_project_info(f, right[1], page, app);
}

fn draw_back_bar(f: &mut Frame, area: Rect, page: &ProjectPage, regions: &mut LayoutRegions) {
    let theme = get_theme();
    let back = " ← Back to projects ";
    let back_width = (back.chars().count() as u16).min(area.width);
    regions.back = Some(Rect {
        width: back_width,
        ..area
    });

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(back, Style::new().fg(theme.accent)),
            Span::styled("  ", theme.label_style()),
            Span::styled(page.project.title.clone(), theme.title_style()),
        ])),
        area,
    );
}

fn detail_lines(page: &ProjectPage, app: &App) -> Vec<Line<'static>> {
    let theme = get_theme();
    let detail = &page.detail;
    let mut lines = vec![
        section_heading("Overview", theme),
        Line::from(Span::styled(detail.intro.clone(), theme.value_style())),
        Line::default(),
    ];

    if !detail.features.is_empty() {
        lines.push(section_heading("Key Features", theme));
        for feature in &detail.features {
            lines.push(Line::from(vec![
                Span::styled("  ✓ ", Style::new().fg(theme.success)),
                Span::styled(feature.clone(), theme.value_style()),
            ]));
        }
        lines.push(Line::default());
    }

    if !detail.challenges.is_empty() {
        lines.push(section_heading("Challenges & Solutions", theme));
        for challenge in &detail.challenges {
            lines.push(Line::from(vec![
                Span::styled("  ▸ ", Style::new().fg(theme.warning)),
                Span::styled(challenge.problem.clone(), theme.value_style()),
            ]));
            if let Some(solution) = &challenge.solution {
                lines.push(Line::from(vec![
                    Span::styled("    ↳ ", Style::new().fg(theme.success)),
                    Span::styled(solution.clone(), theme.label_style()),
                ]));
            }
        }
        lines.push(Line::default());
    }

    lines.push(section_heading("Documentation", theme));
    match &page.readme {
        ReadmeState::Loading => lines.push(Line::from(Span::styled(
            format!("{} Loading project documentation...", app.loading.current_frame()),
            theme.label_style(),
        ))),
        ReadmeState::Loaded(document) => lines.extend(document_lines(document, theme)),
        ReadmeState::Unavailable(_) => lines.push(Line::from(Span::styled(
            "README file not available for this project",
            theme.label_style(),
        ))),
    }

    lines
}

fn draw_coming_soon(f: &mut Frame, area: Rect) {
    let theme = get_theme();
    let block = block_with_title(" ● Demo ").border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("Tutorial Coming Soon", theme.title_style())),
        Line::default(),
        Line::from(Span::styled(
            "A detailed video tutorial for this project is in the works!",
            theme.label_style(),
        )),
    ];
    let height = (lines.len() as u16).min(inner.height);
    let text_area = Rect {
        y: inner.y + inner.height.saturating_sub(height) / 2,
        height,
        ..inner
    };
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        text_area,
    );
}

fn draw_screenshot(f: &mut Frame, area: Rect, page: &ProjectPage, image_cache: &mut ImageCache) {
    let theme = get_theme();

    let block = block_with_title(" ● Screenshot ")
        .border_style(Style::new().fg(theme.fg_dim))
        .style(Style::default().bg(theme.bg));

    let image_area = block.inner(area);
    f.render_widget(block, area);

    let message = match page.screenshot.as_deref() {
        None => "No screenshots yet",
        Some(path) if image_cache.current_path() == Some(path) => {
            if let Some(ref mut protocol) = image_cache.current_image {
                f.render_stateful_widget(StatefulImage::default(), image_area, protocol);
                return;
            }
            "Loading screenshot..."
        }
        Some(_) => "Loading screenshot...",
    };

    let text_area = Rect {
        y: image_area.y + image_area.height / 2,
        height: 1.min(image_area.height),
        ..image_area
    };
    f.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(theme.label_style()),
        text_area,
    );
}

fn draw_project_info(f: &mut Frame, area: Rect, page: &ProjectPage, app: &App) {
    let theme = get_theme();
    let project = &page.project;

    let mut lines = vec![section_heading("Technologies", theme)];
    for tech in &page.detail.technologies {
        lines.push(Line::from(vec![
            Span::styled("  ◆ ", Style::new().fg(theme.accent_alt)),
            Span::styled(tech.clone(), theme.value_style()),
        ]));
    }
    lines.push(Line::default());
    lines.push(section_heading("Links", theme));
    lines.push(Line::from(vec![
        Span::styled("GitHub  ", theme.label_style()),
        Span::styled(project.github.clone(), theme.value_style()),
    ]));
    let demo = if project.has_demo() {
        project.demo.clone()
    } else {
        "none".to_string()
    };
    lines.push(Line::from(vec![
        Span::styled("Demo    ", theme.label_style()),
        Span::styled(demo, theme.value_style()),
    ]));

    let readme = match &page.readme {
        ReadmeState::Loading => {
            Span::styled(format!("{} loading", app.loading.current_frame()), theme.label_style())
        }
        ReadmeState::Loaded(_) => Span::styled("✓ loaded", Style::new().fg(theme.success)),
        ReadmeState::Unavailable(_) => Span::styled("not available", theme.label_style()),
    };
    lines.push(Line::from(vec![
        Span::styled("README  ", theme.label_style()),
        readme,
    ]));

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block_with_title(" ● Details ").border_style(theme.border_style(false))),
        area,
    );
}

/// Draws the player and returns where its controls landed.
pub fn draw_player(f: &mut Frame, area: Rect, player: &DemoPlayer) -> ControlRegions {
    let theme = get_theme();
    let view = player.view();

    let title = format!(" ▶ {} ", view.title.as_deref().unwrap_or("Demo"));
    let mut block = block_with_title(&title).border_style(theme.border_style(view.playing));
    if view.visible {
        block = block
            .title_bottom(Line::from(format!(" f: {} ", view.fullscreen_label)).right_aligned());
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut regions = ControlRegions {
        surface: Some(area),
        seek_max: player.state().duration.unwrap_or(0.0),
        ..Default::default()
    };

    if view.visible && inner.height >= 4 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);
        draw_screen(f, rows[0], &view, player);
        draw_controls(f, rows[1], &view, &mut regions);
    } else {
        draw_screen(f, inner, &view, player);
    }

    regions
}

fn draw_screen(f: &mut Frame, area: Rect, view: &ControlsView, player: &DemoPlayer) {
    let theme = get_theme();
    if area.height == 0 {
        return;
    }

    let lines = if view.show_play_glyph {
        let glyph = Style::new().fg(theme.accent);
        vec![
            Line::from(Span::styled("╭───────╮", glyph)),
            Line::from(Span::styled("│   ▶   │", glyph)),
            Line::from(Span::styled("╰───────╯", glyph)),
        ]
    } else if view.playing {
        vec![
            Line::from(Span::styled(
                level_bars(player.state().current_time, area.width.saturating_sub(4)),
                Style::new().fg(theme.particle),
            )),
            Line::from(Span::styled("now playing", theme.label_style())),
        ]
    } else {
        vec![Line::from(Span::styled("❚❚ Paused", theme.label_style()))]
    };

    let height = (lines.len() as u16).min(area.height);
    let centered = Rect {
        y: area.y + area.height.saturating_sub(height) / 2,
        height,
        ..area
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
}

/// A bouncing level meter driven by the playback position.
fn level_bars(time: f64, width: u16) -> String {
    const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    (0..width.min(48))
        .map(|i| {
            let phase = time * 6.0 + f64::from(i) * 0.7;
            let level = ((phase.sin() * 0.5 + 0.5) * 7.0).round() as usize;
            LEVELS[level.min(7)]
        })
        .collect()
}

fn slider_line(width: u16, fraction: f64, filled_color: ratatui::style::Color) -> Line<'static> {
    let theme = get_theme();
    let width = width as usize;
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let head = filled.saturating_sub(1);

    let mut done = String::new();
    let mut rest = String::new();
    for i in 0..width {
        if i < head {
            done.push('━');
        } else if i == head {
            done.push('●');
        } else {
            rest.push('─');
        }
    }

    Line::from(vec![
        Span::styled(done, Style::new().fg(filled_color)),
        Span::styled(rest, Style::new().fg(theme.fg_dim)),
    ])
}

fn draw_controls(f: &mut Frame, area: Rect, view: &ControlsView, regions: &mut ControlRegions) {
    let theme = get_theme();
    if area.height < 2 || area.width < 4 {
        return;
    }

    let seek = Rect::new(area.x + 1, area.y, area.width - 2, 1);
    f.render_widget(
        Paragraph::new(slider_line(
            seek.width,
            view.progress / 100.0,
            theme.slider_color(view.playing),
        )),
        seek,
    );
    regions.seek = Some(seek);

    let row = Rect::new(area.x + 1, area.y + 1, area.width - 2, 1);

    // Fullscreen sits at the right edge, the rest flows from the left.
    let fullscreen_label = if view.fullscreen { "⤡ Exit" } else { "⤢ Full" };
    let fullscreen_width = fullscreen_label.chars().count() as u16;
    let mut right = row.right();
    if fullscreen_width < row.width {
        let rect = Rect::new(right - fullscreen_width, row.y, fullscreen_width, 1);
        f.render_widget(
            Paragraph::new(fullscreen_label).style(theme.value_style()),
            rect,
        );
        regions.fullscreen = Some(rect);
        right = rect.x.saturating_sub(1);
    }

    let mut x = row.x;
    let mut place = |width: u16| -> Option<Rect> {
        if x + width > right {
            return None;
        }
        let rect = Rect::new(x, row.y, width, 1);
        x += width + 2;
        Some(rect)
    };

    let play_label = format!("{} {}", if view.playing { "❚❚" } else { "▶" }, view.play_label);
    let mute_label = format!("{} {}", if view.muted { "×" } else { "♪" }, view.mute_label);
    let buttons: [(String, fn(&mut ControlRegions, Rect)); 4] = [
        (play_label, |r, rect| r.play = Some(rect)),
        ("«10s".to_string(), |r, rect| r.skip_back = Some(rect)),
        ("10s»".to_string(), |r, rect| r.skip_forward = Some(rect)),
        (mute_label, |r, rect| r.mute = Some(rect)),
    ];
    for (label, record) in buttons {
        let Some(rect) = place(label.chars().count() as u16) else {
            return;
        };
        f.render_widget(
            Paragraph::new(label).style(Style::new().fg(theme.accent)),
            rect,
        );
        record(regions, rect);
    }

    if let Some(rect) = place(VOLUME_SLIDER_WIDTH) {
        let level = if view.muted { 0.0 } else { view.volume };
        f.render_widget(
            Paragraph::new(slider_line(rect.width, level, theme.accent_alt)),
            rect,
        );
        regions.volume = Some(rect);
    }

    let time = view.time_label.clone();
    if let Some(rect) = place(time.chars().count() as u16) {
        f.render_widget(Paragraph::new(time).style(theme.label_style()), rect);
    }
}

fn draw_notifications(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let width = 48.min(area.width);
    let mut y = area.y + 1;

    for notification in app.notifications.active_notifications().iter().rev() {
        let text = format!("{} {}", notification.level.prefix(), notification.text);
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let height = (text.chars().count().div_ceil(inner_width) as u16 + 2).min(6);
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
        let color = match notification.level {
            NotificationLevel::Info => theme.accent,
            NotificationLevel::Success => theme.success,
            NotificationLevel::Warning => theme.warning,
            NotificationLevel::Error => theme.error,
        };

        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .style(Style::new().fg(theme.fg).bg(theme.bg_highlight))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_set(ROUNDED_BORDER)
                        .border_style(Style::new().fg(color)),
                ),
            rect,
        );
        y += height;
    }
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let keybinds = match (&app.route, app.focus) {
        (Route::Project(_), _) if app.player.is_some() => {
            "Space: Play/Pause | ←→: ∓10s | m: Mute | +/-: Volume | f: Fullscreen | ↑↓: Scroll | Esc: Back | q: Quit"
        }
        (Route::Project(_), _) => "↑↓/jk: Scroll | Esc/b: Back | q: Quit",
        (Route::Home, Focus::Form) => {
            "Tab/↑↓: Next field | Enter: Next/Send | Esc: Leave form | Ctrl-C: Quit"
        }
        (Route::Home, Focus::Nav) => match app.section {
            Section::Projects => {
                "←→/Tab: Section | 1-6: Jump | ↑↓/jk: Select | Enter: Open | q: Quit"
            }
            Section::Contact => "←→/Tab: Section | 1-6: Jump | Enter: Write a message | q: Quit",
            _ => "←→/Tab: Section | 1-6: Jump | ↑↓/jk: Scroll | q: Quit",
        },
    };

    f.render_widget(
        Paragraph::new(keybinds)
            .style(theme.label_style())
            .block(block_with_title("").border_style(theme.border_style(false))),
        area,
    );
}
