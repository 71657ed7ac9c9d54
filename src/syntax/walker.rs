use std::rc::Rc;

use syn::{ImplItem, Item, TraitItem};

use super::{
    Container, ContainerKind, Declaration, DeclarationNode, NamespaceScope, is_declaration,
    item_name,
};

/// Lazy pre-order walk over the declarations of a file.
///
/// Descends through the file root, inline modules, `impl` blocks and traits;
/// a container is yielded before its members. Function bodies and other
/// statement-level nodes are never entered.
pub struct DeclarationWalker<'ast> {
    stack: Vec<Frame<'ast>>,
}

enum Frame<'ast> {
    Items {
        items: std::slice::Iter<'ast, Item>,
        namespaces: Rc<Vec<NamespaceScope>>,
    },
    ImplItems {
        items: std::slice::Iter<'ast, ImplItem>,
        namespaces: Rc<Vec<NamespaceScope>>,
        container: Rc<Container>,
    },
    TraitItems {
        items: std::slice::Iter<'ast, TraitItem>,
        namespaces: Rc<Vec<NamespaceScope>>,
        container: Rc<Container>,
    },
}

impl<'ast> DeclarationWalker<'ast> {
    pub fn new(file: &'ast syn::File) -> Self {
        Self {
            stack: vec![Frame::Items {
                items: file.items.iter(),
                namespaces: Rc::new(Vec::new()),
            }],
        }
    }

    fn enter(item: &'ast Item, namespaces: &Rc<Vec<NamespaceScope>>) -> Option<Frame<'ast>> {
        match item {
            Item::Mod(m) => {
                let (_, items) = m.content.as_ref()?;
                let mut nested = namespaces.as_ref().clone();
                nested.push(NamespaceScope::from_item_mod(m));
                Some(Frame::Items {
                    items: items.iter(),
                    namespaces: Rc::new(nested),
                })
            }
            Item::Impl(i) => Some(Frame::ImplItems {
                items: i.items.iter(),
                namespaces: Rc::clone(namespaces),
                container: Rc::new(Container {
                    kind: ContainerKind::Impl,
                    name: item_name(item).unwrap_or_default(),
                }),
            }),
            Item::Trait(t) => Some(Frame::TraitItems {
                items: t.items.iter(),
                namespaces: Rc::clone(namespaces),
                container: Rc::new(Container {
                    kind: ContainerKind::Trait,
                    name: t.ident.to_string(),
                }),
            }),
            _ => None,
        }
    }
}

impl Iterator for DeclarationWalker<'_> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Declaration> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Items { items, namespaces } => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    if !is_declaration(item) {
                        continue;
                    }
                    let namespaces = Rc::clone(namespaces);
                    let child = Self::enter(item, &namespaces);
                    let declaration =
                        Declaration::new(DeclarationNode::Item(item.clone()), namespaces, None);
                    if let Some(child) = child {
                        self.stack.push(child);
                    }
                    return Some(declaration);
                }
                Frame::ImplItems {
                    items,
                    namespaces,
                    container,
                } => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    if matches!(item, ImplItem::Verbatim(_)) {
                        continue;
                    }
                    return Some(Declaration::new(
                        DeclarationNode::ImplItem(item.clone()),
                        Rc::clone(namespaces),
                        Some(Rc::clone(container)),
                    ));
                }
                Frame::TraitItems {
                    items,
                    namespaces,
                    container,
                } => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    if matches!(item, TraitItem::Verbatim(_)) {
                        continue;
                    }
                    return Some(Declaration::new(
                        DeclarationNode::TraitItem(item.clone()),
                        Rc::clone(namespaces),
                        Some(Rc::clone(container)),
                    ));
                }
            }
        }
    }
}
