//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;
use crate::models::NavIcon;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuArrowDown as SortDesc, LuArrowUp as SortAsc, LuCalendar as Calendar,
        LuChevronDown as ChevronDown, LuChevronLeft as ChevronLeft,
        LuChevronRight as ChevronRight, LuCircleCheck as Success, LuCircleUser as Profile,
        LuExternalLink as ExternalLink, LuFile as File, LuFolder as Folder,
        LuFolderInput as Move, LuFolderOpen as Documents, LuHistory as Activity,
        LuHouse as Home, LuInfo as Info, LuLayoutDashboard as Dashboard, LuLink as FileLink,
        LuLogOut as Logout, LuPencil as Edit, LuPlus as Plus, LuRefreshCw as Retry,
        LuSearch as Search, LuShieldCheck as Admin, LuTrash2 as Delete,
        LuTriangleAlert as Warning, LuUsers as Users, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowDown as SortDesc, BsArrowRepeat as Retry, BsArrowUp as SortAsc,
        BsBoxArrowRight as Logout, BsBoxArrowUpRight as ExternalLink, BsCalendar3 as Calendar,
        BsCheckCircle as Success, BsChevronDown as ChevronDown, BsChevronLeft as ChevronLeft,
        BsChevronRight as ChevronRight, BsClockHistory as Activity,
        BsExclamationTriangle as Warning, BsFileEarmark as File, BsFolder2Open as Documents,
        BsFolderFill as Folder, BsFolderSymlink as Move, BsHouseFill as Home,
        BsInfoCircle as Info, BsLink45deg as FileLink, BsPencil as Edit, BsPeople as Users,
        BsPersonCircle as Profile, BsPlusLg as Plus, BsSearch as Search,
        BsShieldLock as Admin, BsSpeedometer2 as Dashboard, BsTrash as Delete, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

// Navigation
themed_icon!(DASHBOARD, Dashboard);
themed_icon!(DOCUMENTS, Documents);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(FILE_LINK, FileLink);
themed_icon!(CALENDAR, Calendar);
themed_icon!(ADMIN, Admin);
themed_icon!(USERS, Users);
themed_icon!(ACTIVITY, Activity);
themed_icon!(PROFILE, Profile);
themed_icon!(HOME, Home);
themed_icon!(LOGOUT, Logout);

// Actions
themed_icon!(PLUS, Plus);
themed_icon!(EDIT, Edit);
themed_icon!(DELETE, Delete);
themed_icon!(MOVE, Move);
themed_icon!(SEARCH, Search);
themed_icon!(RETRY, Retry);
themed_icon!(CLOSE, Close);
themed_icon!(EXTERNAL_LINK, ExternalLink);

// Chevrons and sorting
themed_icon!(CHEVRON_LEFT, ChevronLeft);
themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(CHEVRON_DOWN, ChevronDown);
themed_icon!(SORT_ASC, SortAsc);
themed_icon!(SORT_DESC, SortDesc);

// Feedback
themed_icon!(SUCCESS, Success);
themed_icon!(WARNING, Warning);
themed_icon!(INFO, Info);

/// Icon for a navigation entry.
pub fn nav_icon(icon: NavIcon) -> Icon {
    match icon {
        NavIcon::Dashboard => DASHBOARD,
        NavIcon::Documents => DOCUMENTS,
        NavIcon::Folder => FOLDER,
        NavIcon::File => FILE,
        NavIcon::Calendar => CALENDAR,
        NavIcon::Admin => ADMIN,
        NavIcon::Users => USERS,
        NavIcon::Activity => ACTIVITY,
        NavIcon::Profile => PROFILE,
    }
}
