// src/app/vue.rs
//
// Vue egui de la calculatrice complexe.
// "=" insère une affectation dans l’entrée ; "Évaluer" (ou Enter) soumet la ligne.

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::format::DIGITS_MAX;
use crate::noyau::session::AIDE;

impl AppCalc {
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice complexe");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_variables(ui);
                self.ui_demarche(ui);
                self.ui_aide(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: z = 3 - 4i, mod(z), con(z) / (1 + i)")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter : le TextEdit monoligne perd le focus en validant
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.soumettre();
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface l’historique (variables conservées)",
                Action::ClearHistorique,
            );
            self.bouton_action(
                ui,
                "AC",
                "Nouvelle session : variables et format remis à zéro",
                Action::ResetTotal,
            );

            ui.separator();

            let mut sci = self.session.config().scientifique;
            let avant = sci;
            ui.selectable_value(&mut sci, false, "fixed");
            ui.selectable_value(&mut sci, true, "sci");
            if sci != avant {
                self.set_scientifique(sci);
            }

            let mut d = self.session.config().digits;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=DIGITS_MAX)
                    .suffix(" chiffres"),
            );
            if resp.changed() {
                self.set_digits(d);
            }
        });

        ui.add_space(8.0);

        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "=", "=", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "i", "i", InsertKind::Digit);
            self.bouton_insert(ui, "con", "con(", InsertKind::Func);
            self.bouton_insert(ui, "mod", "mod(", InsertKind::Func);

            ui.add_space(10.0);

            let eval = ui.add_sized([84.0, 32.0], egui::Button::new("Évaluer"));
            if eval.clicked() {
                self.soumettre();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(&self.erreur)
                    .monospace()
                    .color(ui.visuals().error_fg_color),
            );
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", InsertKind::Digit);
                self.bouton_insert(ui, "8", "8", InsertKind::Digit);
                self.bouton_insert(ui, "9", "9", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", InsertKind::Digit);
                self.bouton_insert(ui, "5", "5", InsertKind::Digit);
                self.bouton_insert(ui, "6", "6", InsertKind::Digit);
                self.bouton_insert(ui, "e", "e", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", InsertKind::Digit);
                self.bouton_insert(ui, "2", "2", InsertKind::Digit);
                self.bouton_insert(ui, "3", "3", InsertKind::Digit);
                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup "con(" et "mod(".
    fn backspace_entree(&mut self) {
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in ["con(", "mod("] {
            if let Some(reste) = self.entree.strip_suffix(pat) {
                let n = reste.len();
                self.entree.truncate(n);
                return;
            }
        }

        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(true)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.weak("(vide)");
                    return;
                }

                egui::ScrollArea::vertical()
                    .id_salt("historique_scroll")
                    .max_height(220.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for ligne in &self.historique {
                            ui.monospace(format!(">>> {}", ligne.entree));
                            if ligne.erreur {
                                ui.label(
                                    egui::RichText::new(&ligne.sortie)
                                        .monospace()
                                        .color(ui.visuals().error_fg_color),
                                );
                            } else if !ligne.sortie.is_empty() {
                                ui.monospace(&ligne.sortie);
                            }
                        }
                    });
            });
    }

    fn ui_variables(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Variables")
            .default_open(true)
            .show(ui, |ui| {
                let vars = self.session.variables();
                if vars.is_empty() {
                    ui.weak("(aucune)");
                    return;
                }

                egui::Grid::new("variables_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (nom, valeur) in &vars {
                            ui.monospace(nom);
                            ui.monospace(valeur);
                            ui.end_row();
                        }
                    });
            });
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                ui.label("Jetons :");
                Self::champ_monospace(ui, "demarche_jetons", self.session.derniers_jetons(), 2);
            });
    }

    fn ui_aide(&mut self, ui: &mut egui::Ui) {
        let resp = egui::CollapsingHeader::new("Aide")
            .open(self.aide_ouverte.then_some(true))
            .show(ui, |ui| {
                Self::champ_monospace(ui, "aide_txt", AIDE, 10);
            });
        // ouverture forcée une seule frame après `help`
        self.aide_ouverte = false;
        if resp.header_response.clicked() {
            self.focus_entree = true;
        }
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearHistorique => self.clear_historique(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func => {
                let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                if let Some(c) = last {
                    if c.is_ascii_alphanumeric() || c == ')' {
                        self.entree.push(' ');
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => self.entree.push_str(to_insert),
        }

        self.focus_entree = true;
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearHistorique,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Func,
    Op,
    OpenParen,
    CloseParen,
}
