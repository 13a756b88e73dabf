//! Object construction: `new`, anonymous types, arrays, member and
//! collection initializers.

use crate::translation::analysis::is_implicitly_typed_array;
use crate::translation::context::TranslationContext;
use crate::translation::translators::calls::argument_list;
use crate::translation::translators::{TranslationBox, TranslationBuilder};
use readex_core::expr::{
    ElementInit, ListInitExpr, MemberBinding, MemberInitExpr, NewArrayExpr, NewExpr,
};
use readex_core::{ExprKind, TypeRef};

/// Initializer contents longer than this go one item per line.
pub const MAX_INITIALIZER_LENGTH: usize = 40;

// ── Initializer sets ────────────────────────────────────────────────

enum InitializerItem {
    Value(TranslationBox),
    Named(String, TranslationBox),
    Nested(String, InitializerSet),
}

impl InitializerItem {
    fn size(&self) -> usize {
        match self {
            InitializerItem::Value(value) => value.translation_size(),
            InitializerItem::Named(name, value) => {
                name.chars().count() + 3 + value.translation_size()
            }
            InitializerItem::Nested(name, set) => name.chars().count() + 3 + set.short_size(),
        }
    }

    fn is_multi_line(&self) -> bool {
        match self {
            InitializerItem::Value(value) | InitializerItem::Named(_, value) => {
                value.is_multi_line()
            }
            InitializerItem::Nested(_, set) => set.is_long(),
        }
    }
}

/// The `{ ... }` part of an initializer. Built in full before layout so a
/// set written long lays out its nested sets long as well.
struct InitializerSet {
    items: Vec<InitializerItem>,
}

impl InitializerSet {
    fn contents_size(&self) -> usize {
        let separators = 2 * self.items.len().saturating_sub(1);
        self.items.iter().map(InitializerItem::size).sum::<usize>() + separators
    }

    fn short_size(&self) -> usize {
        self.contents_size() + 4
    }

    fn is_long(&self) -> bool {
        self.contents_size() > MAX_INITIALIZER_LENGTH
            || self.items.iter().any(InitializerItem::is_multi_line)
    }

    /// Appends ` { a, b }`, or the braces and items on their own lines.
    fn write<'c>(
        self,
        builder: TranslationBuilder<'c>,
        force_long: bool,
    ) -> TranslationBuilder<'c> {
        let long = force_long || self.is_long();
        if self.items.is_empty() {
            return builder.text(" { }");
        }
        let mut builder = if long {
            builder.new_line().text("{").indent()
        } else {
            builder.text(" { ")
        };
        for (index, item) in self.items.into_iter().enumerate() {
            if index > 0 {
                builder = builder.text(",");
                builder = if long { builder.new_line() } else { builder.space() };
            } else if long {
                builder = builder.new_line();
            }
            builder = match item {
                InitializerItem::Value(value) => builder.child(value),
                InitializerItem::Named(name, value) => builder.text(&name).text(" = ").child(value),
                InitializerItem::Nested(name, set) => {
                    set.write(builder.text(&name).text(" ="), long)
                }
            };
        }
        if long {
            builder.unindent().new_line().text("}")
        } else {
            builder.text(" }")
        }
    }
}

fn element_items(
    ctx: &TranslationContext<'_>,
    initializers: &[ElementInit],
) -> Vec<InitializerItem> {
    initializers
        .iter()
        .map(|init| match init.arguments.as_slice() {
            [single] => InitializerItem::Value(ctx.translate(single)),
            arguments => InitializerItem::Value(
                ctx.builder(ExprKind::ListInit, TypeRef::void())
                    .text("{ ")
                    .children(arguments.iter().map(|arg| ctx.translate(arg)), ", ")
                    .text(" }")
                    .build(),
            ),
        })
        .collect()
}

fn binding_items(ctx: &TranslationContext<'_>, bindings: &[MemberBinding]) -> Vec<InitializerItem> {
    bindings
        .iter()
        .map(|binding| match binding {
            MemberBinding::Assignment { member, expression } => {
                InitializerItem::Named(member.name.clone(), ctx.translate(expression))
            }
            MemberBinding::Member { member, bindings } => InitializerItem::Nested(
                member.name.clone(),
                InitializerSet {
                    items: binding_items(ctx, bindings),
                },
            ),
            MemberBinding::List { member, initializers } => InitializerItem::Nested(
                member.name.clone(),
                InitializerSet {
                    items: element_items(ctx, initializers),
                },
            ),
        })
        .collect()
}

// ── Construction ────────────────────────────────────────────────────

pub fn translate_new(ctx: &TranslationContext<'_>, new: &NewExpr) -> TranslationBox {
    let builder = ctx.builder(ExprKind::New, new.ty.clone()).keyword("new");
    if new.ty.is_anonymous() {
        let items = new
            .members
            .iter()
            .zip(&new.arguments)
            .map(|(name, value)| InitializerItem::Named(name.clone(), ctx.translate(value)))
            .collect();
        return InitializerSet { items }.write(builder, false).build();
    }
    let parameters = new.constructor.as_ref().map(|c| c.parameters.as_slice()).unwrap_or(&[]);
    builder
        .space()
        .type_name(&new.ty)
        .child(argument_list(ctx, &new.arguments, parameters))
        .build()
}

/// `new T` plus constructor arguments when there are any; `new T()` is
/// left to the initializer-less case.
fn new_with_arguments<'c>(
    ctx: &'c TranslationContext<'_>,
    kind: ExprKind,
    new: &NewExpr,
) -> TranslationBuilder<'c> {
    let builder = ctx.builder(kind, new.ty.clone()).keyword("new").space().type_name(&new.ty);
    if new.arguments.is_empty() {
        builder
    } else {
        builder.child(argument_list(ctx, &new.arguments, &[]))
    }
}

pub fn translate_member_init(
    ctx: &TranslationContext<'_>,
    init: &MemberInitExpr,
) -> TranslationBox {
    let builder = new_with_arguments(ctx, ExprKind::MemberInit, &init.new);
    if init.bindings.is_empty() {
        return builder.when(init.new.arguments.is_empty(), |b| b.text("()")).build();
    }
    let set = InitializerSet {
        items: binding_items(ctx, &init.bindings),
    };
    set.write(builder, false).build()
}

pub fn translate_list_init(ctx: &TranslationContext<'_>, init: &ListInitExpr) -> TranslationBox {
    let builder = new_with_arguments(ctx, ExprKind::ListInit, &init.new);
    if init.initializers.is_empty() {
        return builder.when(init.new.arguments.is_empty(), |b| b.text("()")).build();
    }
    let set = InitializerSet {
        items: element_items(ctx, &init.initializers),
    };
    set.write(builder, false).build()
}

/// `new T[n, m]`, `new T[0]`, `new[] { ... }` or `new T[] { ... }`.
pub fn translate_new_array(ctx: &TranslationContext<'_>, array: &NewArrayExpr) -> TranslationBox {
    let kind = if array.bounds {
        ExprKind::NewArrayBounds
    } else {
        ExprKind::NewArrayInit
    };
    let ty = if array.bounds {
        TypeRef::array_of_rank(array.element_type.clone(), array.expressions.len().max(1) as u8)
    } else {
        TypeRef::array(array.element_type.clone())
    };
    let builder = ctx.builder(kind, ty).keyword("new");

    if array.bounds || array.expressions.is_empty() {
        let (innermost, suffix) = split_jagged(&array.element_type);
        let builder = builder.space().type_name(&innermost).text("[");
        let builder = if array.bounds {
            builder.children(array.expressions.iter().map(|bound| ctx.translate(bound)), ", ")
        } else {
            builder.text("0")
        };
        return builder.text("]").text(&suffix).build();
    }

    let builder = if is_implicitly_typed_array(array, ctx.settings()) {
        builder.text("[]")
    } else {
        builder.space().type_name(&array.element_type).text("[]")
    };
    let items = array
        .expressions
        .iter()
        .map(|element| InitializerItem::Value(ctx.translate(element)))
        .collect();
    InitializerSet { items }.write(builder, false).build()
}

/// The non-array type at the bottom of a jagged element type, and the
/// brackets of the array levels above it.
fn split_jagged(element_type: &TypeRef) -> (TypeRef, String) {
    let mut suffix = String::new();
    let mut current = element_type.clone();
    while let Some(inner) = current.element_type().cloned() {
        suffix.push('[');
        for _ in 1..current.rank() {
            suffix.push(',');
        }
        suffix.push(']');
        current = inner;
    }
    (current, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_element_types_split() {
        let jagged = TypeRef::array(TypeRef::array_of_rank(TypeRef::int(), 2));
        let (innermost, suffix) = split_jagged(&jagged);
        assert_eq!(innermost, TypeRef::int());
        assert_eq!(suffix, "[][,]");
        assert_eq!(split_jagged(&TypeRef::string()).1, "");
    }
}
