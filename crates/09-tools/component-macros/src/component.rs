//! `#[derive(Component)]` 实现
//!
//! 在编译期收集字段上的 `#[parameter]`、`#[resource]`、`#[inherit]` 标记，
//! 生成属性表声明和按属性路径写入字段的代码。

use crate::utils::{encode_default, extract_resource_type, field_has_attribute, generate_setter_name};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Field, Fields, Ident, LitStr, Result, Type};
use wiring_common::FieldShape;

/// 结构体级别的 `#[component(...)]` 参数
#[derive(Debug, Default)]
pub struct ComponentArgs {
    /// 初始化钩子方法名
    pub init: Option<Ident>,
}

impl ComponentArgs {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = ComponentArgs::default();
        for attr in &input.attrs {
            if !attr.path().is_ident("component") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("init") {
                    let method: LitStr = meta.value()?.parse()?;
                    args.init = Some(method.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("未知的 component 参数"))
                }
            })?;
        }
        Ok(args)
    }
}

/// 字段的写入方式
#[derive(Debug, Clone, PartialEq)]
pub enum WriteTarget {
    /// 直接赋值字段
    Field,
    /// 调用设置器方法
    Setter(Ident),
}

/// `#[parameter(...)]` 字段
#[derive(Debug)]
pub struct ParameterField {
    pub ident: Ident,
    pub ty: Type,
    pub name: Option<String>,
    pub description: Option<String>,
    pub mandatory: bool,
    pub default_value: Option<Vec<String>>,
    pub target: WriteTarget,
}

/// `#[resource(...)]` 字段
#[derive(Debug)]
pub struct ResourceField {
    pub ident: Ident,
    pub resource_type: Type,
    pub key: Option<String>,
    pub description: Option<String>,
    pub mandatory: bool,
    pub target: WriteTarget,
}

/// `#[inherit]` 字段
#[derive(Debug)]
pub struct InheritField {
    pub ident: Ident,
    pub ty: Type,
}

/// 带标记的字段
#[derive(Debug)]
pub enum MarkedField {
    Parameter(ParameterField),
    Resource(ResourceField),
    Inherit(InheritField),
}

impl MarkedField {
    /// 解析字段标记，未标记的字段返回 `None`
    pub fn from_field(field: &Field) -> Result<Option<Self>> {
        let markers = ["parameter", "resource", "inherit"]
            .iter()
            .filter(|name| field_has_attribute(field, name))
            .count();
        if markers > 1 {
            return Err(syn::Error::new_spanned(
                field,
                "字段只能带 parameter、resource 或 inherit 中的一个标记",
            ));
        }

        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "只支持具名字段"));
        };

        for attr in &field.attrs {
            if attr.path().is_ident("parameter") {
                return parse_parameter(ident, field, attr).map(|p| Some(Self::Parameter(p)));
            }
            if attr.path().is_ident("resource") {
                return parse_resource(ident, field, attr).map(|r| Some(Self::Resource(r)));
            }
            if attr.path().is_ident("inherit") {
                attr.meta.require_path_only()?;
                return Ok(Some(Self::Inherit(InheritField {
                    ident,
                    ty: field.ty.clone(),
                })));
            }
        }
        Ok(None)
    }
}

fn parse_setter(meta: &syn::meta::ParseNestedMeta, ident: &Ident) -> Result<WriteTarget> {
    if meta.input.peek(syn::Token![=]) {
        let method: LitStr = meta.value()?.parse()?;
        Ok(WriteTarget::Setter(method.parse()?))
    } else {
        Ok(WriteTarget::Setter(generate_setter_name(&ident.to_string())))
    }
}

fn parse_parameter(ident: Ident, field: &Field, attr: &syn::Attribute) -> Result<ParameterField> {
    let ty = &field.ty;
    FieldShape::classify(&quote!(#ty).to_string())
        .map_err(|message| syn::Error::new_spanned(ty, message))?;

    let mut parameter = ParameterField {
        ident: ident.clone(),
        ty: field.ty.clone(),
        name: None,
        description: None,
        mandatory: true,
        default_value: None,
        target: WriteTarget::Field,
    };

    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(parameter);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let name: LitStr = meta.value()?.parse()?;
            if name.value().is_empty() {
                return Err(syn::Error::new_spanned(name, "参数名称不能为空"));
            }
            parameter.name = Some(name.value());
        } else if meta.path.is_ident("description") {
            let description: LitStr = meta.value()?.parse()?;
            parameter.description = Some(description.value());
        } else if meta.path.is_ident("optional") {
            parameter.mandatory = false;
        } else if meta.path.is_ident("mandatory") {
            parameter.mandatory = true;
        } else if meta.path.is_ident("default") {
            let expr: Expr = meta.value()?.parse()?;
            parameter.default_value = Some(encode_default(&expr)?);
        } else if meta.path.is_ident("setter") {
            parameter.target = parse_setter(&meta, &ident)?;
        } else {
            return Err(meta.error("未知的 parameter 参数"));
        }
        Ok(())
    })?;

    Ok(parameter)
}

fn parse_resource(ident: Ident, field: &Field, attr: &syn::Attribute) -> Result<ResourceField> {
    let resource_type = extract_resource_type(&field.ty)
        .cloned()
        .ok_or_else(|| syn::Error::new_spanned(&field.ty, "资源字段的类型必须是 Option<Arc<T>>"))?;

    let mut resource = ResourceField {
        ident: ident.clone(),
        resource_type,
        key: None,
        description: None,
        mandatory: true,
        target: WriteTarget::Field,
    };

    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(resource);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
            let key: LitStr = meta.value()?.parse()?;
            if !wiring_common::NamingConventions::is_valid_key_segment(&key.value()) {
                return Err(syn::Error::new_spanned(key, "资源键不能为空，且不能包含分隔符或空白"));
            }
            resource.key = Some(key.value());
        } else if meta.path.is_ident("description") {
            let description: LitStr = meta.value()?.parse()?;
            resource.description = Some(description.value());
        } else if meta.path.is_ident("optional") {
            resource.mandatory = false;
        } else if meta.path.is_ident("mandatory") {
            resource.mandatory = true;
        } else if meta.path.is_ident("setter") {
            resource.target = parse_setter(&meta, &ident)?;
        } else {
            return Err(meta.error("未知的 resource 参数"));
        }
        Ok(())
    })?;

    Ok(resource)
}

fn optional_call(method: &str, value: &Option<String>) -> TokenStream {
    match value {
        Some(value) => {
            let method = Ident::new(method, proc_macro2::Span::call_site());
            quote! { .#method(#value) }
        }
        None => quote! {},
    }
}

fn scan_statement(field: &MarkedField) -> TokenStream {
    match field {
        MarkedField::Parameter(parameter) => {
            let attribute = parameter.ident.to_string();
            let ty = &parameter.ty;
            let field_type = quote!(#ty).to_string();
            let name = optional_call("name", &parameter.name);
            let description = optional_call("description", &parameter.description);
            let mandatory = parameter.mandatory;
            let default_value = match &parameter.default_value {
                Some(values) => quote! {
                    .default_value({
                        let values: &[&str] = &[#(#values),*];
                        values.iter().copied()
                    })
                },
                None => quote! {},
            };
            quote! {
                scan.parameter(
                    #attribute,
                    #field_type,
                    ::wiring_common::ParameterMarker::new()
                        #name
                        #description
                        .mandatory(#mandatory)
                        #default_value,
                );
            }
        }
        MarkedField::Resource(resource) => {
            let attribute = resource.ident.to_string();
            let resource_type = &resource.resource_type;
            let key = optional_call("key", &resource.key);
            let description = optional_call("description", &resource.description);
            let mandatory = resource.mandatory;
            quote! {
                scan.resource(
                    #attribute,
                    ::std::any::type_name::<#resource_type>(),
                    ::wiring_common::ResourceMarker::new()
                        #key
                        #description
                        .mandatory(#mandatory),
                );
            }
        }
        MarkedField::Inherit(inherit) => {
            let attribute = inherit.ident.to_string();
            let ty = &inherit.ty;
            quote! {
                scan.inherit::<#ty>(#attribute);
            }
        }
    }
}

fn delegations(fields: &[MarkedField], call: TokenStream) -> Vec<TokenStream> {
    fields
        .iter()
        .filter_map(|field| match field {
            MarkedField::Inherit(inherit) => Some(inherit),
            _ => None,
        })
        .map(|inherit| {
            let ident = &inherit.ident;
            let prefix = format!("{}{}", ident, wiring_common::ATTRIBUTE_SEPARATOR);
            quote! {
                if let Some(rest) = attribute.strip_prefix(#prefix) {
                    return ::wiring_common::Component::#call(&mut self.#ident, rest, value);
                }
            }
        })
        .collect()
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let component_name = quote!(::std::any::type_name::<Self>());
    let args = ComponentArgs::from_input(&input)?;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Component 只能派生在结构体上"));
    };

    let marked = match &data.fields {
        Fields::Named(named) => {
            let mut marked = Vec::new();
            for field in &named.named {
                if let Some(field) = MarkedField::from_field(field)? {
                    marked.push(field);
                }
            }
            marked
        }
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(&input.ident, "Component 只能派生在具名字段结构体上"));
        }
    };

    let scan_statements: Vec<_> = marked.iter().map(scan_statement).collect();

    let parameter_arms: Vec<_> = marked
        .iter()
        .filter_map(|field| match field {
            MarkedField::Parameter(parameter) => Some(parameter),
            _ => None,
        })
        .map(|parameter| {
            let ident = &parameter.ident;
            let attribute = ident.to_string();
            let parameter_name = parameter.name.clone().unwrap_or_else(|| attribute.clone());
            let converted = quote! {
                ::wiring_common::FromParameterValue::from_parameter_value(value).map_err(|mismatch| {
                    ::wiring_common::WiringError::type_mismatch(#component_name, #parameter_name, mismatch)
                })?
            };
            let write = match &parameter.target {
                WriteTarget::Field => quote! { self.#ident = #converted; },
                WriteTarget::Setter(setter) => quote! { self.#setter(#converted); },
            };
            quote! {
                #attribute => {
                    #write
                    Ok(())
                }
            }
        })
        .collect();

    let resource_arms: Vec<_> = marked
        .iter()
        .filter_map(|field| match field {
            MarkedField::Resource(resource) => Some(resource),
            _ => None,
        })
        .map(|resource| {
            let ident = &resource.ident;
            let attribute = ident.to_string();
            let resource_type = &resource.resource_type;
            let downcast = quote! {
                value.downcast::<#resource_type>().map_err(|_| {
                    ::wiring_common::WiringError::type_mismatch(
                        #component_name,
                        #attribute,
                        ::wiring_common::ValueMismatch::new(
                            ::std::any::type_name::<#resource_type>(),
                            "其他资源类型",
                        ),
                    )
                })?
            };
            let write = match &resource.target {
                WriteTarget::Field => quote! { self.#ident = Some(#downcast); },
                WriteTarget::Setter(setter) => quote! { self.#setter(#downcast); },
            };
            quote! {
                #attribute => {
                    #write
                    Ok(())
                }
            }
        })
        .collect();

    let parameter_delegations = delegations(&marked, quote!(apply_parameter));
    let resource_delegations = delegations(&marked, quote!(inject_resource));

    let base_initializers: Vec<_> = marked
        .iter()
        .filter_map(|field| match field {
            MarkedField::Inherit(inherit) => Some(&inherit.ident),
            _ => None,
        })
        .map(|ident| quote! { ::wiring_common::Component::initialize(&mut self.#ident)?; })
        .collect();
    let own_initializer = match &args.init {
        Some(method) => quote! { self.#method().map_err(::std::convert::Into::into) },
        None => quote! { Ok(()) },
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::wiring_common::Component for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn scan(scan: &mut ::wiring_common::AttributeScan) {
                #(#scan_statements)*
            }

            #[allow(unused_variables)]
            fn apply_parameter(
                &mut self,
                attribute: &str,
                value: &::wiring_common::ParameterValue,
            ) -> ::wiring_common::WiringResult<()> {
                match attribute {
                    #(#parameter_arms)*
                    _ => {
                        #(#parameter_delegations)*
                        Err(::wiring_common::WiringError::binding_target(#component_name, attribute))
                    }
                }
            }

            #[allow(unused_variables)]
            fn inject_resource(
                &mut self,
                attribute: &str,
                value: ::wiring_common::SharedResource,
            ) -> ::wiring_common::WiringResult<()> {
                match attribute {
                    #(#resource_arms)*
                    _ => {
                        #(#resource_delegations)*
                        Err(::wiring_common::WiringError::binding_target(#component_name, attribute))
                    }
                }
            }

            fn initialize(&mut self) -> ::std::result::Result<(), ::wiring_common::BoxError> {
                #(#base_initializers)*
                #own_initializer
            }
        }
    })
}
