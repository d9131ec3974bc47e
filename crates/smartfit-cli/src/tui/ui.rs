//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use smartfit_core::export::tutorial_url;
use smartfit_core::onboarding::Step;
use smartfit_core::session::Screen;
use smartfit_store::models::{UserData, WorkoutPlan};

use super::app::{AltState, App, DashRow, Overlay, WizardField};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the current screen and any overlay on top of it.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.session.screen() {
        Screen::Onboarding => render_wizard(f, app, chunks[0]),
        Screen::Generating { user } => render_generating(f, app, user, chunks[0]),
        Screen::Failed { message, detail } => render_failed(f, message, detail, chunks[0]),
        Screen::Dashboard { plan, user } => render_dashboard(f, app, plan, user, chunks[0]),
    }

    match &app.overlay {
        Some(Overlay::Help) => render_help(f, app, chunks[0]),
        Some(Overlay::Alternatives(_)) => render_alternatives(f, app, chunks[0]),
        Some(Overlay::ConfirmReset) => render_confirm_reset(f, chunks[0]),
        None => {}
    }

    render_status_bar(f, app, chunks[1]);
}

// -- Onboarding --

fn render_wizard(f: &mut Frame, app: &App, area: Rect) {
    let step = app.wizard.step();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Passo {} de {}: {} ",
            step.number(),
            Step::COUNT,
            step.title()
        )))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(app.wizard.progress());
    f.render_widget(gauge, chunks[0]);

    let fields = app.current_fields();
    let mut lines = Vec::with_capacity(fields.len() * 2);
    let mut last_section = "";
    for (i, field) in fields.iter().enumerate() {
        let section = section_title(*field);
        if section != last_section {
            if !last_section.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!(" {section}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            last_section = section;
        }
        lines.push(field_line(app, *field, i == app.field_cursor));
    }

    let hint = if app.wizard.is_last_step() {
        " Enter: gerar plano "
    } else {
        " Enter: próximo "
    };
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" SmartFit ")
            .title_bottom(Line::from(hint).alignment(Alignment::Right)),
    );
    f.render_widget(body, chunks[1]);
}

fn section_title(field: WizardField) -> &'static str {
    match field {
        WizardField::Gender(_) => "Gênero",
        WizardField::Weight | WizardField::Height => "Medidas",
        WizardField::Goal(_) => "Objetivo",
        WizardField::Experience(_) => "Nível de experiência",
        WizardField::Duration => "Tempo por treino",
        WizardField::Day(_) => "Dias disponíveis",
        WizardField::Location(_) => "Local de treino",
        WizardField::Muscle(_) => "Músculos alvo (Espaço: marcar, f: foco)",
    }
}

fn field_line(app: &App, field: WizardField, selected: bool) -> Line<'static> {
    let draft = app.wizard.draft();
    let radio = |on: bool| if on { "(•)" } else { "( )" };
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let text = match field {
        WizardField::Gender(g) => format!("{} {}", radio(draft.gender == Some(g)), g.label()),
        WizardField::Weight => format!("Peso:    < {} kg >", draft.weight),
        WizardField::Height => format!("Altura:  < {} cm >", draft.height),
        WizardField::Goal(g) => format!("{} {}", radio(draft.goal == Some(g)), g.label()),
        WizardField::Experience(e) => {
            format!("{} {}", radio(draft.experience == Some(e)), e.label())
        }
        WizardField::Duration => format!("< {} min >", draft.duration),
        WizardField::Day(d) => format!("{} {d}", check(draft.days.iter().any(|x| x == d))),
        WizardField::Location(l) => {
            format!("{} {}", radio(draft.location == Some(l)), l.label())
        }
        WizardField::Muscle(m) => {
            let on = draft.target_muscles.iter().any(|x| x == m);
            let focus = if draft.focus_muscle.as_deref() == Some(m) {
                "  * foco"
            } else {
                ""
            };
            format!("{} {m}{focus}", check(on))
        }
    };

    let style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("   {text}"), style))
}

// -- Generation --

fn render_generating(f: &mut Frame, app: &App, user: &UserData, area: Rect) {
    let frame = SPINNER[(app.ticks as usize) % SPINNER.len()];
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{frame} Analisando seu perfil..."),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Montando {} dia(s) de treino para {} com foco em {}",
            user.days.len(),
            user.goal.short_label(),
            user.focus_muscle
        )),
    ];
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" SmartFit "));
    f.render_widget(body, area);
}

fn render_failed(f: &mut Frame, message: &str, detail: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Ops!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Tentar Novamente",
            Style::default().fg(Color::Yellow),
        )),
    ];
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" SmartFit "));
    f.render_widget(body, area);
}

// -- Dashboard --

fn render_dashboard(f: &mut Frame, app: &App, plan: &WorkoutPlan, user: &UserData, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Seu Plano Smart", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  Foco: "),
            Span::styled(user.focus_muscle.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(format!(
            "Objetivo: {}   Freq: {} Dias/Sem   Duração: {} min",
            user.goal.short_label(),
            user.days.len(),
            user.duration
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let rows = app.dashboard_rows();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let style = if i == app.dash_cursor {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let text = match *row {
                DashRow::Day(d) => {
                    let day = plan.days().get(d)?;
                    let marker = if app.dashboard.is_expanded(d) { "v" } else { ">" };
                    format!(
                        "{marker} {} - {}  ({} exercícios)",
                        day.day,
                        day.focus,
                        day.exercises.len()
                    )
                }
                DashRow::Exercise { day, index } => {
                    let ex = plan.days().get(day)?.exercises.get(index)?;
                    format!(
                        "    {:<28} {:>2} x {:<8} {}",
                        truncate(&ex.name, 28),
                        ex.sets,
                        ex.reps,
                        ex.muscle
                    )
                }
            };
            Some(Line::from(Span::styled(text, style)))
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Treinos ({} dias) ", plan.len())),
    );
    f.render_widget(list, chunks[1]);

    render_exercise_detail(f, app, plan, chunks[2]);
}

fn render_exercise_detail(f: &mut Frame, app: &App, plan: &WorkoutPlan, area: Rect) {
    let selected = match app.selected_row() {
        Some(DashRow::Exercise { day, index }) => {
            plan.days().get(day).and_then(|d| d.exercises.get(index))
        }
        _ => None,
    };

    let text = match selected {
        Some(ex) => vec![
            Line::from(vec![
                Span::styled("Dica: ", Style::default().fg(Color::Yellow)),
                Span::raw(ex.notes.clone()),
            ]),
            Line::from(vec![
                Span::styled("Tutorial: ", Style::default().fg(Color::Yellow)),
                Span::styled(tutorial_url(&ex.name), Style::default().fg(Color::Blue)),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Selecione um exercício para ver dicas e trocar (s).",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let detail = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Detalhes "));
    f.render_widget(detail, area);
}

// -- Overlays --

fn render_alternatives(f: &mut Frame, app: &App, area: Rect) {
    let Some(Overlay::Alternatives(popup)) = &app.overlay else {
        return;
    };
    let rect = centered_rect(60, 40, area);

    let lines = match &popup.state {
        AltState::Loading => {
            let frame = SPINNER[(app.ticks as usize) % SPINNER.len()];
            vec![Line::from(format!("{frame} Buscando alternativas..."))]
        }
        AltState::Empty => vec![
            Line::from(Span::styled(
                "Falha ao buscar alternativas. Tente novamente.",
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from("Esc: fechar"),
        ],
        AltState::Ready { options, selected } => {
            let mut lines: Vec<Line> = options
                .iter()
                .enumerate()
                .map(|(i, ex)| {
                    let style = if i == *selected {
                        Style::default()
                            .bg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(
                        format!(" {} ({})  {} x {}", ex.name, ex.muscle, ex.sets, ex.reps),
                        style,
                    ))
                })
                .collect();
            lines.push(Line::from(""));
            lines.push(Line::from("Enter: trocar   Esc: cancelar"));
            lines
        }
    };

    f.render_widget(Clear, rect);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Trocar {} ", popup.exercise_name)),
    );
    f.render_widget(body, rect);
}

fn render_confirm_reset(f: &mut Frame, area: Rect) {
    let rect = centered_rect(50, 20, area);
    let text = vec![
        Line::from(""),
        Line::from("Apagar o plano e as preferências salvas?"),
        Line::from(""),
        Line::from(Span::styled(
            "y: apagar   qualquer outra tecla: cancelar",
            Style::default().fg(Color::Yellow),
        )),
    ];
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Refazer Perfil ")),
        rect,
    );
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let heading = |s: &'static str| {
        Line::from(Span::styled(
            s,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    };

    let mut text = vec![
        Line::from(""),
        heading("  Navigation"),
        Line::from("    j/Down    Move down"),
        Line::from("    k/Up      Move up"),
    ];
    match app.session.screen() {
        Screen::Dashboard { .. } => text.extend([
            Line::from("    Enter     Expand day / swap exercise"),
            Line::from(""),
            heading("  Actions"),
            Line::from("    s         Show alternatives for selected exercise"),
            Line::from("    x         Export plan as Markdown"),
            Line::from("    R         Reset profile and plan"),
        ]),
        _ => text.extend([
            Line::from("    Enter     Next step / generate plan"),
            Line::from("    Esc/Bksp  Previous step"),
            Line::from(""),
            heading("  Editing"),
            Line::from("    Space     Select option / toggle"),
            Line::from("    h/l       Adjust value (PgUp/PgDn: by 10)"),
            Line::from("    f         Mark muscle as focus"),
        ]),
    }
    text.extend([
        Line::from(""),
        heading("  Other"),
        Line::from("    ?         Show this help"),
        Line::from("    q         Quit"),
    ]);

    let rect = centered_rect(60, 70, area);
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help ")),
        rect,
    );
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let screen_name = app.session.screen().name();
    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {screen_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        if app.is_generating() {
            Span::styled("aguardando IA", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
        Span::raw("  "),
        Span::styled(status_msg.to_string(), Style::default().fg(Color::Green)),
        Span::raw("  q:quit  ?:help"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
