//! 展開カードの状態
//!
//! 一覧内で展開できるカードは1枚だけ。選択確定は展開中のカードでのみ可能。

/// カード一覧の展開状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardState<Id> {
    #[default]
    Collapsed,
    Expanded(Id),
}

impl<Id: PartialEq + Clone> CardState<Id> {
    /// カードがタップされた: 展開中なら閉じ、それ以外なら展開
    pub fn tap(&mut self, id: &Id) {
        let next = match &*self {
            CardState::Expanded(current) if current == id => CardState::Collapsed,
            _ => CardState::Expanded(id.clone()),
        };
        *self = next;
    }

    pub fn is_expanded(&self, id: &Id) -> bool {
        matches!(self, CardState::Expanded(current) if current == id)
    }

    pub fn expanded(&self) -> Option<&Id> {
        match self {
            CardState::Expanded(id) => Some(id),
            CardState::Collapsed => None,
        }
    }

    /// 選択を確定（展開中のカードのみ）。確定後は閉じる
    pub fn confirm(&mut self, id: &Id) -> Option<Id> {
        if !self.is_expanded(id) {
            return None;
        }
        *self = CardState::Collapsed;
        Some(id.clone())
    }

    pub fn collapse(&mut self) {
        *self = CardState::Collapsed;
    }
}
