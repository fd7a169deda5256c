use eframe::egui;
use hashbrown::HashMap;
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use dataset_tagger::filter::Partition;
use dataset_tagger::settings::{Settings, COLUMN_CHOICES};
use dataset_tagger::thumbnails::{ThumbnailLoader, ThumbnailMessage};
use dataset_tagger::tree::DirNode;
use dataset_tagger::{
    Action, Dialogs, FolderSession, Position, Renderer, UnsavedChoice, Workspace,
};

use crate::dialogs::NativeDialogs;

const ACTIVE_TAG_COLOR: egui::Color32 = egui::Color32::from_rgb(0x80, 0xff, 0x80);

/// Cached per-card text plus the with/without grouping, refreshed when
/// the workspace asks for it.
#[derive(Default)]
struct GridView {
    partition: Partition,
    filter_text: String,
    tag_lines: HashMap<usize, Vec<(String, bool)>>,
}

impl Renderer for GridView {
    fn render_record(&mut self, session: &FolderSession, index: usize) {
        if let Some(record) = session.record(index) {
            let line = record
                .tags()
                .iter()
                .map(|tag| (tag.clone(), session.tags().is_active(tag)))
                .collect();
            self.tag_lines.insert(index, line);
        }
    }

    fn render_all(&mut self, session: &FolderSession) {
        self.partition = session.partition();
        self.filter_text = session.tags().active_tags().join(", ");
        self.tag_lines.clear();
        for index in 0..session.len() {
            self.render_record(session, index);
        }
    }
}

struct SortWindow {
    search: String,
    checked: Vec<(String, bool)>,
    position: Position,
}

struct ReplaceWindow {
    entries: Vec<(String, String)>,
}

pub struct TaggerApp {
    settings: Settings,
    workspace: Workspace,
    dialogs: NativeDialogs,
    grid: GridView,
    tree: Option<DirNode>,
    thumbnails: ThumbnailLoader,
    textures: HashMap<usize, egui::TextureHandle>,
    failed_thumbnails: HashMap<usize, String>,
    global_tag: String,
    record_inputs: HashMap<usize, String>,
    tag_search: String,
    sort_window: Option<SortWindow>,
    replace_window: Option<ReplaceWindow>,
    about_open: bool,
}

impl TaggerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut app = Self {
            settings,
            workspace: Workspace::new(),
            dialogs: NativeDialogs,
            grid: GridView::default(),
            tree: None,
            thumbnails: ThumbnailLoader::new(),
            textures: HashMap::new(),
            failed_thumbnails: HashMap::new(),
            global_tag: String::new(),
            record_inputs: HashMap::new(),
            tag_search: String::new(),
            sort_window: None,
            replace_window: None,
            about_open: false,
        };

        if let Some(folder) = app.settings.restorable_folder().map(Path::to_path_buf) {
            info!("Reopening {}", folder.display());
            app.tree = Some(DirNode::build(&folder));
            app.open_folder(&folder);
        }
        app
    }

    fn pick_root_folder(&mut self) {
        if let Some(folder) = FileDialog::new().set_title("Open folder").pick_folder() {
            self.tree = Some(DirNode::build(&folder));
            self.open_folder(&folder);
        }
    }

    fn open_folder(&mut self, folder: &Path) {
        if !self
            .workspace
            .open_folder(folder, &mut self.dialogs, &mut self.grid)
        {
            return;
        }

        self.textures.clear();
        self.failed_thumbnails.clear();
        self.record_inputs.clear();

        if let Some(session) = self.workspace.session() {
            let paths = session
                .records()
                .iter()
                .map(|record| record.path().to_path_buf())
                .collect();
            self.thumbnails.start(paths, self.settings.thumbnail_size);
        }

        self.settings.last_folder = Some(folder.to_path_buf());
        self.persist_settings();
    }

    fn persist_settings(&self) {
        if let Err(err) = self.settings.save() {
            warn!("Failed to save settings: {}", err);
        }
    }

    fn run(&mut self, action: Action) {
        self.workspace.run(action, &mut self.dialogs, &mut self.grid);
    }

    fn set_columns(&mut self, columns: usize) {
        self.settings.columns = columns;
        if let Some(session) = self.workspace.session() {
            self.grid.render_all(session);
        }
        self.persist_settings();
    }

    fn receive_thumbnails(&mut self, ctx: &egui::Context) {
        let messages = self.thumbnails.poll();
        if messages.is_empty() {
            if self.thumbnails.is_running() {
                ctx.request_repaint();
            }
            return;
        }

        for message in messages {
            match message {
                ThumbnailMessage::Decoded {
                    index,
                    width,
                    height,
                    pixels,
                    ..
                } => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [width as usize, height as usize],
                        &pixels,
                    );
                    let texture = ctx.load_texture(
                        format!("thumb_{}", index),
                        color_image,
                        egui::TextureOptions::default(),
                    );
                    self.textures.insert(index, texture);
                }
                ThumbnailMessage::Failed { index, error, .. } => {
                    self.failed_thumbnails.insert(index, error);
                }
            }
        }
        ctx.request_repaint();
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (select_all, invert, deselect) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && i.key_pressed(egui::Key::A),
                command && i.key_pressed(egui::Key::I),
                command && i.key_pressed(egui::Key::D),
            )
        });
        if select_all {
            self.run(Action::SelectAll);
        }
        if invert {
            self.run(Action::InvertSelection);
        }
        if deselect {
            self.run(Action::DeselectAll);
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        if self.workspace.has_unsaved_changes() {
            match self.dialogs.ask_unsaved_changes() {
                UnsavedChoice::Save => {
                    self.workspace.save(&mut self.dialogs);
                }
                UnsavedChoice::Discard => {}
                UnsavedChoice::Cancel => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                    return;
                }
            }
        }
        self.persist_settings();
    }

    fn open_sort_window(&mut self) {
        if !self.workspace.require_images(&mut self.dialogs) {
            return;
        }
        let checked = self
            .workspace
            .session()
            .map(|session| {
                session
                    .tags()
                    .vocabulary()
                    .iter()
                    .map(|tag| (tag.clone(), false))
                    .collect()
            })
            .unwrap_or_default();
        self.sort_window = Some(SortWindow {
            search: String::new(),
            checked,
            position: Position::Beginning,
        });
    }

    fn open_replace_window(&mut self) {
        if let Some(tags) = self.workspace.require_active_filters(&mut self.dialogs) {
            self.replace_window = Some(ReplaceWindow {
                entries: tags.into_iter().map(|tag| (tag, String::new())).collect(),
            });
        }
    }

    fn delete_filtered_tags(&mut self) {
        if let Some(tags) = self.workspace.require_active_filters(&mut self.dialogs) {
            self.run(Action::DeleteTags(tags));
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open folder").clicked() {
                        ui.close_menu();
                        self.pick_root_folder();
                    }
                    if ui.button("Save").clicked() {
                        ui.close_menu();
                        self.workspace.save(&mut self.dialogs);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Tool", |ui| {
                    if ui.button("Remove duplicate tags").clicked() {
                        ui.close_menu();
                        self.run(Action::RemoveDuplicates);
                    }
                    if ui.button("Sort tags").clicked() {
                        ui.close_menu();
                        self.open_sort_window();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.about_open = true;
                    }
                });
            });
        });
    }

    fn directory_panel(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::SidePanel::left("directory_panel")
            .default_width(250.0)
            .min_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Folder directory");
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_source("directory_tree")
                    .show(ui, |ui| match &self.tree {
                        Some(tree) => {
                            let current = self.workspace.session().map(FolderSession::folder);
                            draw_tree(ui, tree, current, &mut clicked);
                        }
                        None => {
                            ui.label("No folder opened.");
                        }
                    });
            });

        if let Some(folder) = clicked {
            self.open_folder(&folder);
        }
    }

    fn tags_panel(&mut self, ctx: &egui::Context) {
        let mut pending = Vec::new();
        let mut insert = None;
        let mut clear_filters = false;
        let mut delete = false;
        let mut replace = false;

        egui::SidePanel::right("tags_panel")
            .resizable(false)
            .min_width(300.0)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Search tags");
                ui.horizontal(|ui| {
                    ui.label("Search");
                    ui.text_edit_singleline(&mut self.tag_search);
                });
                ui.horizontal(|ui| {
                    if ui.button("Clear Input").clicked() {
                        self.tag_search.clear();
                    }
                    clear_filters = ui.button("Deselect").clicked();
                    delete = ui.button("Delete Tags").clicked();
                    replace = ui.button("Replace Tags").clicked();
                });
                ui.separator();

                let Some(session) = self.workspace.session() else {
                    return;
                };
                egui::ScrollArea::vertical()
                    .id_source("folder_tags")
                    .show(ui, |ui| {
                        for tag in session.tags().search(&self.tag_search) {
                            ui.horizontal(|ui| {
                                let mut active = session.tags().is_active(tag);
                                if ui
                                    .checkbox(&mut active, session.tags().label(tag))
                                    .changed()
                                {
                                    pending.push(Action::ToggleFilter(tag.to_string()));
                                }
                                if ui.small_button("Insert").clicked() {
                                    insert = Some(tag.to_string());
                                }
                            });
                        }
                    });
            });

        if clear_filters {
            pending.push(Action::ClearFilters);
        }
        for action in pending {
            self.run(action);
        }
        if let Some(tag) = insert {
            self.global_tag.insert_str(0, &tag);
        }
        if delete {
            self.delete_filtered_tags();
        }
        if replace {
            self.open_replace_window();
        }
    }

    fn bottom_bar(&mut self, ctx: &egui::Context) {
        let mut action = None;
        egui::TopBottomPanel::bottom("tag_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Tag:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.global_tag).desired_width(320.0),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add Tag").clicked() || submitted {
                    action = Some(Action::AddTagToSelection(self.global_tag.clone()));
                }
                if ui.button("Remove Tag (must be same name of tag)").clicked() {
                    action = Some(Action::RemoveTagFromSelection(self.global_tag.clone()));
                }

                if let Some(session) = self.workspace.session() {
                    ui.separator();
                    ui.label(format!(
                        "{} selected, {} unsaved",
                        session.selection().len(),
                        session.dirty_count()
                    ));
                }
            });
            ui.add_space(4.0);
        });

        if let Some(action) = action {
            if self
                .workspace
                .run(action, &mut self.dialogs, &mut self.grid)
                .is_some()
            {
                self.global_tag.clear();
            }
        }
    }

    fn image_grid(&mut self, ctx: &egui::Context) {
        let mut pending = Vec::new();
        let mut columns = None;
        let mut save = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("✔ Select All (Ctrl+A)").clicked() {
                    pending.push(Action::SelectAll);
                }
                if ui.button("🔁 Invert Select (Ctrl+I)").clicked() {
                    pending.push(Action::InvertSelection);
                }
                if ui.button("❌ Deselect All (Ctrl+D)").clicked() {
                    pending.push(Action::DeselectAll);
                }
                save = ui.button("💾 Save").clicked();
            });
            ui.horizontal(|ui| {
                ui.label("Visible columns:");
                for n in COLUMN_CHOICES {
                    if ui
                        .selectable_label(self.settings.columns == n, n.to_string())
                        .clicked()
                    {
                        columns = Some(n);
                    }
                }
            });

            if self.thumbnails.is_running() {
                ui.add(
                    egui::ProgressBar::new(self.thumbnails.progress())
                        .show_percentage()
                        .desired_width(ui.available_width()),
                );
            }
            ui.separator();

            let Some(session) = self.workspace.session() else {
                ui.centered_and_justified(|ui| {
                    ui.label("No folder loaded. Please open a folder.");
                });
                return;
            };

            let cards = CardContext {
                session,
                grid: &self.grid,
                textures: &self.textures,
                failed: &self.failed_thumbnails,
                columns: self.settings.columns,
                size: self.settings.thumbnail_size as f32,
            };
            let inputs = &mut self.record_inputs;

            egui::ScrollArea::vertical()
                .id_source("image_grid")
                .show(ui, |ui| {
                    let partition = &self.grid.partition;
                    if partition.filtered {
                        if !partition.with.is_empty() {
                            ui.heading(format!("📁 Images WITH tags: {}", self.grid.filter_text));
                            cards.rows(ui, &partition.with, inputs, &mut pending);
                        }
                        if !partition.without.is_empty() {
                            ui.separator();
                            ui.heading(format!(
                                "📁 Images WITHOUT tags: {}",
                                self.grid.filter_text
                            ));
                            cards.rows(ui, &partition.without, inputs, &mut pending);
                        }
                    } else {
                        cards.rows(ui, &partition.with, inputs, &mut pending);
                    }
                });
        });

        for action in pending {
            self.run(action);
        }
        if save {
            self.workspace.save(&mut self.dialogs);
        }
        if let Some(n) = columns {
            self.set_columns(n);
        }
    }

    fn sort_window(&mut self, ctx: &egui::Context) {
        let Some(mut window) = self.sort_window.take() else {
            return;
        };
        let mut open = true;
        let mut confirmed = false;

        egui::Window::new("Choose tags (global)")
            .open(&mut open)
            .collapsible(false)
            .default_size([380.0, 620.0])
            .show(ctx, |ui| {
                ui.text_edit_singleline(&mut window.search);
                let term = window.search.trim().to_lowercase();
                egui::ScrollArea::vertical()
                    .id_source("sort_tags")
                    .max_height(480.0)
                    .show(ui, |ui| {
                        for (tag, checked) in window.checked.iter_mut() {
                            if term.is_empty() || tag.to_lowercase().contains(&term) {
                                ui.checkbox(checked, tag.as_str());
                            }
                        }
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Move to:");
                    ui.radio_value(&mut window.position, Position::Beginning, "beginning");
                    ui.radio_value(&mut window.position, Position::Ending, "ending");
                });
                ui.horizontal(|ui| {
                    if ui.button("Deselect").clicked() {
                        for (_, checked) in window.checked.iter_mut() {
                            *checked = false;
                        }
                    }
                    confirmed = ui.button("Confirm").clicked();
                });
            });

        if confirmed {
            let tags = window
                .checked
                .iter()
                .filter(|(_, checked)| *checked)
                .map(|(tag, _)| tag.clone())
                .collect();
            self.run(Action::Reposition {
                tags,
                position: window.position,
            });
        } else if open {
            self.sort_window = Some(window);
        }
    }

    fn replace_window(&mut self, ctx: &egui::Context) {
        let Some(mut window) = self.replace_window.take() else {
            return;
        };
        let mut open = true;
        let mut confirmed = false;

        egui::Window::new("Replace Tags")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Enter the new tag that corresponds to each old tag:");
                egui::Grid::new("replace_grid").num_columns(2).show(ui, |ui| {
                    for (old, new) in window.entries.iter_mut() {
                        ui.label(old.as_str());
                        ui.text_edit_singleline(new);
                        ui.end_row();
                    }
                });
                confirmed = ui.button("Confirm").clicked();
            });

        let applied = confirmed
            && self
                .workspace
                .run(
                    Action::ReplaceTags(window.entries.clone()),
                    &mut self.dialogs,
                    &mut self.grid,
                )
                .is_some();
        if open && !applied {
            self.replace_window = Some(window);
        }
    }

    fn about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.about_open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(format!("Dataset Tagger {}", env!("CARGO_PKG_VERSION")));
                ui.label("Browse a folder of images and edit their comma-separated tag files.");
            });
    }
}

/// Read-only state needed to draw image cards.
struct CardContext<'a> {
    session: &'a FolderSession,
    grid: &'a GridView,
    textures: &'a HashMap<usize, egui::TextureHandle>,
    failed: &'a HashMap<usize, String>,
    columns: usize,
    size: f32,
}

impl CardContext<'_> {
    fn rows(
        &self,
        ui: &mut egui::Ui,
        indices: &[usize],
        inputs: &mut HashMap<usize, String>,
        pending: &mut Vec<Action>,
    ) {
        for row in indices.chunks(self.columns.max(1)) {
            ui.horizontal_top(|ui| {
                for &index in row {
                    self.card(ui, index, inputs, pending);
                }
            });
        }
    }

    fn card(
        &self,
        ui: &mut egui::Ui,
        index: usize,
        inputs: &mut HashMap<usize, String>,
        pending: &mut Vec<Action>,
    ) {
        let Some(record) = self.session.record(index) else {
            return;
        };
        let selected = self.session.selection().contains(index);
        let stroke = if selected {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(0x4c, 0xaf, 0x50))
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(60))
        };

        egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
            ui.set_width(self.size);
            ui.vertical(|ui| {
                match self.textures.get(&index) {
                    Some(texture) => {
                        ui.add(
                            egui::Image::new(texture)
                                .max_size(egui::vec2(self.size, self.size)),
                        );
                    }
                    None if self.failed.contains_key(&index) => {
                        ui.label("Cannot load image");
                    }
                    None => {
                        ui.spinner();
                    }
                }

                let mut checked = selected;
                if ui.checkbox(&mut checked, record.file_name()).changed() {
                    pending.push(Action::ToggleSelected(index));
                }

                ui.horizontal_wrapped(|ui| match self.grid.tag_lines.get(&index) {
                    Some(line) if !line.is_empty() => {
                        for (tag, active) in line {
                            if *active {
                                ui.colored_label(ACTIVE_TAG_COLOR, tag);
                            } else {
                                ui.label(tag);
                            }
                        }
                    }
                    _ => {
                        ui.weak("*No tags*");
                    }
                });

                ui.horizontal(|ui| {
                    let input = inputs.entry(index).or_default();
                    let response = ui.add(
                        egui::TextEdit::singleline(input).desired_width(self.size - 40.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.small_button("+").clicked() || submitted {
                        pending.push(Action::AddTagToRecord {
                            index,
                            tag: std::mem::take(input),
                        });
                    }
                });
            });
        });
    }
}

fn draw_tree(ui: &mut egui::Ui, node: &DirNode, current: Option<&Path>, clicked: &mut Option<PathBuf>) {
    let is_current = current == Some(node.path.as_path());
    if node.children.is_empty() {
        if ui.selectable_label(is_current, &node.name).clicked() {
            *clicked = Some(node.path.clone());
        }
        return;
    }

    let response = egui::CollapsingHeader::new(&node.name)
        .id_source(&node.path)
        .default_open(true)
        .show(ui, |ui| {
            for child in &node.children {
                draw_tree(ui, child, current, clicked);
            }
        });
    if response.header_response.clicked() {
        *clicked = Some(node.path.clone());
    }
}

impl eframe::App for TaggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_thumbnails(ctx);
        self.handle_shortcuts(ctx);
        self.handle_close_request(ctx);

        self.menu_bar(ctx);
        self.directory_panel(ctx);
        self.tags_panel(ctx);
        self.bottom_bar(ctx);
        self.image_grid(ctx);

        self.sort_window(ctx);
        self.replace_window(ctx);
        self.about_window(ctx);
    }
}
