// backoffice_server/src/views/layout.rs

use backoffice::RecordKind;

use crate::config::AppConfig;
use crate::web::session::Session;

#[derive(Debug, Clone)]
pub struct NavLink {
  pub title: &'static str,
  pub href: &'static str,
  pub active: bool,
}

/// Header and navigation shared by every full page.
#[derive(Debug, Clone)]
pub struct Chrome {
  pub nav: Vec<NavLink>,
  pub user_name: Option<String>,
  pub avatar_url: Option<String>,
  pub sign_in_url: String,
  pub sign_out_url: String,
}

const NAV_ORDER: [RecordKind; 3] = [RecordKind::Users, RecordKind::Customers, RecordKind::Products];

impl Chrome {
  pub fn new(active: Option<RecordKind>, session: &Session, config: &AppConfig) -> Self {
    Self {
      nav: NAV_ORDER
        .iter()
        .map(|kind| NavLink {
          title: kind.title(),
          href: kind.listing_path(),
          active: Some(*kind) == active,
        })
        .collect(),
      user_name: session.user.as_ref().map(|u| u.display_name.clone()),
      avatar_url: session.user.as_ref().and_then(|u| u.avatar_url.clone()),
      sign_in_url: config.sign_in_url.clone(),
      sign_out_url: config.sign_out_url.clone(),
    }
  }
}
