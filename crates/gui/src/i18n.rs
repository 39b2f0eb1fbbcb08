use std::sync::atomic::{AtomicU8, Ordering};

use crate::state::Language;

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Language {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Language::Ru,
        _ => Language::En,
    }
}

pub fn set_lang(l: Language) {
    CURRENT_LANG.store(
        match l {
            Language::En => 0,
            Language::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Language::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.model" => if ru { "Модель" } else { "Model" },
        "menu.reset_parameters" => if ru { "Сбросить параметры" } else { "Reset parameters" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.board_list" => if ru { "Список досок" } else { "Board list" },
        "menu.parameters" => if ru { "Параметры" } else { "Parameters" },
        "menu.tweaks" => if ru { "Настройки вида" } else { "Tweaks" },
        "menu.wireframe" => if ru { "Каркас  W" } else { "Wireframe  W" },
        "menu.reset_camera" => if ru { "Сбросить камеру  R" } else { "Reset camera  R" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.preferences" => if ru { "Параметры приложения..." } else { "Preferences..." },

        // ── Models ──────────────────────────────────────────
        "model.platform" => if ru { "Помост" } else { "Platform" },
        "model.bench" => if ru { "Скамья" } else { "Bench" },
        "model.slotted_bar" => if ru { "Брус с пазами" } else { "Slotted bar" },

        // ── Board list ──────────────────────────────────────
        "boards.title" => if ru { "Доски" } else { "Boards" },
        "boards.empty" => if ru { "Нет досок" } else { "No boards" },

        // ── Parameters ──────────────────────────────────────
        "params.title" => if ru { "Параметры" } else { "Parameters" },
        "params.add_parameter" => if ru { "Добавить параметр" } else { "Add parameter" },
        "params.remove" => if ru { "Удалить параметр" } else { "Remove parameter" },
        "params.no_parameters" => if ru { "Нет параметров" } else { "No parameters" },
        "params.value" => if ru { "Значение:" } else { "Value:" },
        "params.formula" => if ru { "Формула" } else { "Formula" },
        "params.layout_error" => if ru { "Ошибка раскладки" } else { "Layout error" },

        // ── Tweaks ──────────────────────────────────────────
        "tweaks.title" => if ru { "Настройки вида" } else { "Tweaks" },
        "tweaks.explode" => if ru { "Разнесение" } else { "Explode" },
        "tweaks.wireframe" => if ru { "Каркас" } else { "Wireframe" },

        // ── Status bar ──────────────────────────────────────
        "status.boards" => if ru { "Досок" } else { "Boards" },
        "status.hovered" => if ru { "Под курсором" } else { "Hovered" },
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.layout_error" => if ru { "Ошибка" } else { "Error" },
        "status.nav_hint" => if ru {
            "ЛКМ: вращение  ПКМ: сдвиг  Колесо: масштаб  [ ]: разнесение"
        } else {
            "LMB: orbit  RMB: pan  Wheel: zoom  [ ]: explode"
        },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },

        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.show_ground" => if ru { "Показывать землю" } else { "Show ground" },
        "settings.shadows" => if ru { "Тени" } else { "Shadows" },
        "settings.edge_width" => if ru { "Толщина рёбер" } else { "Edge width" },

        "settings.labels" => if ru { "Подписи" } else { "Labels" },
        "settings.labels_visible" => if ru { "Показывать подписи" } else { "Show labels" },
        "settings.label_min" => if ru { "Мин. размер шрифта" } else { "Min font size" },
        "settings.label_max" => if ru { "Макс. размер шрифта" } else { "Max font size" },

        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.rotate_speed" => if ru { "Скорость вращения" } else { "Rotate speed" },
        "settings.zoom_speed" => if ru { "Скорость масштаба" } else { "Zoom speed" },
        "settings.pan_speed" => if ru { "Скорость сдвига" } else { "Pan speed" },

        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },

        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
